//! ElevenLabs text-to-speech engine.
//!
//! Sends each line to the ElevenLabs REST API and returns the MP3 clip it
//! answers with. Authentication is per request: the caller passes the API key
//! chosen from the [credential ledger](crate::ledger) for that line.
//!
//! # Request
//!
//! ```text
//! POST {base_url}/v1/text-to-speech/{voice_id}
//! xi-api-key: <key>
//! Content-Type: application/json
//!
//! { "text": "...", "model_id": "eleven_flash_v2_5",
//!   "voice_settings": { "stability": 0.5, "similarity_boost": 1.0, "speed": 1.0 } }
//! ```
//!
//! A `200` response carries the audio. Any other status is returned as
//! [`ProviderError::Status`](crate::error::ProviderError::Status) with the
//! response body as the message.
//!
//! # Voices
//!
//! | Slug | Voice |
//! |---|---|
//! | `bella` | Bella (female), the default |
//! | `thomas` | Thomas (male) |
//! | `bradford` | Bradford (British) |
//! | `custom-1` | Custom 1 |
//! | `soft-female` | Soft female |
//!
//! Any other string given to [`resolve_voice`] is used as a raw voice id.

pub mod engine;
pub mod voices;

pub use engine::{
    ElevenLabsEngine, ElevenLabsParams, VoiceSettings, DEFAULT_BASE_URL, DEFAULT_MODEL_ID,
};
pub use voices::{find_voice, resolve_voice, VoicePreset, VOICE_CATALOG};
