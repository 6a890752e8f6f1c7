use axum::response::Html;

use super::{Notice, escape, layout, render_notices, user_panel};
use crate::core::generation::GenerationRecord;
use crate::core::tts::{ElevenLabsModel, Voice, VoiceSettings};
use crate::core::tts::elevenlabs::{MAX_SPEED, MAX_UNIT, MIN_SPEED, MIN_UNIT};

/// Everything the studio page shows.
pub struct StudioView<'a> {
    pub username: &'a str,
    pub is_admin: bool,
    /// Voice list, or the reason it could not be loaded
    pub voices: Result<&'a [Voice], String>,
    pub model: ElevenLabsModel,
    pub settings: VoiceSettings,
    pub voice_id: &'a str,
    pub text: &'a str,
    pub notices: Vec<Notice>,
    /// Result of the action that produced this page
    pub result: Option<&'a GenerationRecord>,
    pub recent_tts: &'a [GenerationRecord],
    pub recent_conversions: &'a [GenerationRecord],
}

pub fn studio_page(view: &StudioView<'_>) -> Html<String> {
    let voice_notice = match &view.voices {
        Ok(voices) if voices.is_empty() => render_notices(&[Notice::Warning(
            "No voices available. Check your ElevenLabs account.".to_string(),
        )]),
        Ok(_) => String::new(),
        Err(e) => render_notices(&[Notice::Error(format!("Error fetching voices: {e}"))]),
    };

    let result = view.result.map(render_result).unwrap_or_default();

    let body = format!(
        r#"<main>
<aside>
{user_panel}
<section>
<h3>Settings</h3>
<p class="muted">Model and voice settings apply to both tools.</p>
</section>
</aside>
<div class="content">
{voice_notice}
{notices}
{result}
<section>
<h2>Text-to-Speech</h2>
<form method="post" action="/generate">
<label for="text">Enter text to convert to speech</label>
<textarea id="text" name="text" placeholder="Type or paste your text here...">{text}</textarea>
{voice_select_tts}
{settings_tts}
<p><button type="submit">Generate Voice</button></p>
</form>
</section>
<section>
<h2>Voice Changer</h2>
<form method="post" action="/convert" enctype="multipart/form-data">
<label for="audio">Upload audio to convert (mp3, wav, m4a)</label>
<input id="audio" name="audio" type="file" accept=".mp3,.wav,.m4a,audio/mpeg,audio/wav,audio/mp4">
{voice_select_convert}
{settings_convert}
<p><button type="submit">Convert Voice</button></p>
</form>
</section>
<section>
<h3>Recent Generations</h3>
{recent_tts}
</section>
<section>
<h3>Recent Voice Conversions</h3>
{recent_conversions}
</section>
</div>
</main>"#,
        user_panel = user_panel(view.username, view.is_admin),
        notices = render_notices(&view.notices),
        text = escape(view.text),
        voice_select_tts = voice_select("tts-voice", &view.voices, view.voice_id),
        voice_select_convert = voice_select("convert-voice", &view.voices, view.voice_id),
        settings_tts = settings_fields("tts", view.model, &view.settings),
        settings_convert = settings_fields("convert", view.model, &view.settings),
        recent_tts = history_list(view.recent_tts, "No generations yet."),
        recent_conversions = history_list(view.recent_conversions, "No conversions yet."),
    );

    layout("Studio", &body)
}

fn voice_select(id: &str, voices: &Result<&[Voice], String>, selected: &str) -> String {
    match voices {
        Ok(voices) if !voices.is_empty() => {
            let options: String = voices
                .iter()
                .map(|v| {
                    let sel = if v.voice_id == selected { " selected" } else { "" };
                    format!(
                        r#"<option value="{}"{sel}>{}</option>"#,
                        escape(&v.voice_id),
                        escape(&v.name)
                    )
                })
                .collect();
            format!(
                r#"<label for="{id}">Select Voice</label>
<select id="{id}" name="voice_id">{options}</select>"#
            )
        }
        // Without a list the voice id can still be typed in
        _ => format!(
            r#"<label for="{id}">Voice ID</label>
<input id="{id}" name="voice_id" value="{}">"#,
            escape(selected)
        ),
    }
}

fn settings_fields(prefix: &str, model: ElevenLabsModel, settings: &VoiceSettings) -> String {
    let options: String = ElevenLabsModel::all()
        .iter()
        .map(|m| {
            let sel = if *m == model { " selected" } else { "" };
            format!(
                r#"<option value="{}"{sel}>{}</option>"#,
                m.as_str(),
                escape(m.label())
            )
        })
        .collect();

    let sliders = [
        ("stability", "Stability", settings.stability, MIN_UNIT, MAX_UNIT),
        (
            "similarity_boost",
            "Similarity Boost",
            settings.similarity_boost,
            MIN_UNIT,
            MAX_UNIT,
        ),
        ("speed", "Speed", settings.speed, MIN_SPEED, MAX_SPEED),
        ("style", "Style Exaggeration", settings.style, MIN_UNIT, MAX_UNIT),
    ]
    .iter()
    .map(|(name, label, value, min, max)| {
        format!(
            r#"<label for="{prefix}-{name}">{label} <span class="muted">({min}-{max})</span></label>
<input id="{prefix}-{name}" name="{name}" type="range" min="{min}" max="{max}" step="0.05" value="{value}">"#
        )
    })
    .collect::<String>();

    format!(
        r#"<details>
<summary>Model &amp; voice settings</summary>
<label for="{prefix}-model">Model</label>
<select id="{prefix}-model" name="model_id">{options}</select>
{sliders}
</details>"#
    )
}

fn audio_player(record: &GenerationRecord) -> String {
    let id = escape(&record.id);
    format!(
        r#"<audio controls preload="none" src="/history/{id}/audio"></audio>
<a href="/history/{id}/audio?download=1">Download</a>"#
    )
}

fn render_result(record: &GenerationRecord) -> String {
    format!(
        r#"<section>
<h3>Result</h3>
{}
</section>"#,
        audio_player(record)
    )
}

fn history_list(records: &[GenerationRecord], empty: &str) -> String {
    if records.is_empty() {
        return format!(r#"<p class="muted">{}</p>"#, escape(empty));
    }

    records
        .iter()
        .map(|r| {
            format!(
                r#"<div class="history-item">
<div><strong>{voice}</strong> · {model} <span class="muted">{created}</span></div>
<div>{text}</div>
{player}
</div>"#,
                voice = escape(&r.voice_name),
                model = r.model.as_str(),
                created = escape(&r.created_at),
                text = escape(&r.text),
                player = audio_player(r),
            )
        })
        .collect()
}
