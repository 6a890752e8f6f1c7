//! Server-rendered HTML pages.

mod admin;
mod studio;

pub use admin::{AdminView, admin_page};
pub use studio::{StudioView, studio_page};

use axum::response::Html;

/// Inline message shown above page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Success(t) => ("success", t),
            Notice::Warning(t) => ("warning", t),
            Notice::Error(t) => ("error", t),
        };
        format!(r#"<div class="notice {class}">{}</div>"#, escape(text))
    }
}

pub(crate) fn render_notices(notices: &[Notice]) -> String {
    notices.iter().map(Notice::render).collect()
}

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2328; background: #f6f8fa; }
header { background: #24292f; color: #fff; padding: 0.75rem 1.5rem; }
main { display: flex; gap: 1.5rem; padding: 1.5rem; }
aside { width: 16rem; flex-shrink: 0; }
section { background: #fff; border: 1px solid #d0d7de; border-radius: 6px; padding: 1rem 1.25rem; margin-bottom: 1rem; }
.content { flex: 1; }
.notice { padding: 0.6rem 0.9rem; border-radius: 6px; margin-bottom: 1rem; }
.success { background: #dafbe1; }
.warning { background: #fff8c5; }
.error { background: #ffebe9; }
label { display: block; margin-top: 0.6rem; font-weight: 600; }
textarea { width: 100%; min-height: 8rem; }
table { border-collapse: collapse; width: 100%; }
td, th { border-bottom: 1px solid #d0d7de; padding: 0.4rem; text-align: left; }
.history-item { border-bottom: 1px solid #eaeef2; padding: 0.5rem 0; }
.muted { color: #656d76; font-size: 0.85rem; }
"#;

/// Wrap page content in the shared document layout.
pub(crate) fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Tasty Voice</title>
<style>{STYLE}</style>
</head>
<body>
<header><strong>🎙️ Tasty Voice Studio</strong></header>
{body}
</body>
</html>"#,
        title = escape(title),
    ))
}

/// Login form with an optional error message.
pub fn login_page(error: Option<&str>, username: &str) -> Html<String> {
    let notices: Vec<Notice> = error.map(|e| Notice::Error(e.to_string())).into_iter().collect();
    let body = format!(
        r#"<main><div class="content" style="max-width: 24rem; margin: 2rem auto;">
<section>
<h2>Login</h2>
{notices}
<form method="post" action="/login">
<label for="username">Username</label>
<input id="username" name="username" value="{username}" autocomplete="username" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required>
<p><button type="submit">Login</button></p>
</form>
</section>
</div></main>"#,
        notices = render_notices(&notices),
        username = escape(username),
    );
    layout("Login", &body)
}

/// Shown when a non-admin opens an admin page.
pub fn forbidden_page() -> Html<String> {
    let body = r#"<main><div class="content"><section>
<h2>Access denied</h2>
<div class="notice error">You need admin privileges to view this page.</div>
<p><a href="/">Back to the studio</a></p>
</section></div></main>"#;
    layout("Access denied", body)
}

/// Sidebar block with the user name, logout and (for admins) user management.
pub(crate) fn user_panel(username: &str, is_admin: bool) -> String {
    let admin_link = if is_admin {
        r#"<p><a href="/admin/users">👥 User management</a></p>"#
    } else {
        ""
    };
    format!(
        r#"<section>
<p>Logged in as <strong>{}</strong></p>
{admin_link}
<form method="post" action="/logout"><button type="submit">Logout</button></form>
</section>"#,
        escape(username)
    )
}
