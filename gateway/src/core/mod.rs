pub mod generation;
pub mod tts;

pub use generation::{GenerationError, GenerationKind, GenerationRecord, VoiceChoice};
pub use tts::{
    BoxedSynthesizer, ConversionRequest, ElevenLabsClient, ElevenLabsConfig, ElevenLabsModel,
    SpeechRequest, SpeechSynthesizer, TTSError, TTSResult, Voice, VoiceSettings,
    create_synthesizer,
};
