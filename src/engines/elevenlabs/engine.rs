use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;

use crate::error::ProviderError;
use crate::SynthesisEngine;

use super::voices;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Low-latency multilingual model.
pub const DEFAULT_MODEL_ID: &str = "eleven_flash_v2_5";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "xi-api-key";

/// Voice tuning sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    /// Lower is more expressive. Range: 0.0–1.0.
    pub stability: f32,
    /// Higher stays closer to the original voice. Range: 0.0–1.0.
    pub similarity_boost: f32,
    /// Speech speed multiplier, default 1.0.
    pub speed: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 1.0,
            speed: 1.0,
        }
    }
}

/// Parameters for an ElevenLabs synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevenLabsParams {
    /// Voice id placed in the request path.
    pub voice_id: String,
    /// Model id, e.g. `"eleven_flash_v2_5"`.
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

impl Default for ElevenLabsParams {
    fn default() -> Self {
        Self {
            voice_id: voices::default_voice().voice_id.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            voice_settings: VoiceSettings::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs text-to-speech over blocking HTTP.
///
/// Each call is a single `POST /v1/text-to-speech/{voice_id}`; the response
/// body is the MP3 clip.
///
/// ```rust,no_run
/// use voiceover_rs::{SynthesisEngine, engines::elevenlabs::ElevenLabsEngine};
///
/// let mut engine = ElevenLabsEngine::new()?;
/// let mp3 = engine.synthesize("Hello, world.", "my-api-key", None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ElevenLabsEngine {
    client: Client,
    base_url: String,
}

impl ElevenLabsEngine {
    /// Create an engine talking to the production API with no request timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_BASE_URL, None)
    }

    /// Create an engine against another API root (a proxy or a mock server).
    ///
    /// `timeout` of `None` waits for the provider indefinitely.
    pub fn with_endpoint(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{voice_id}", self.base_url)
    }
}

impl SynthesisEngine for ElevenLabsEngine {
    type SynthesisParams = ElevenLabsParams;

    fn synthesize(
        &mut self,
        text: &str,
        api_key: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<Vec<u8>, ProviderError> {
        let p = params.unwrap_or_default();
        let body = SynthesisRequest {
            text,
            model_id: &p.model_id,
            voice_settings: p.voice_settings,
        };

        log::debug!("POST {} ({} chars)", self.endpoint(&p.voice_id), text.len());

        let response = self
            .client
            .post(self.endpoint(&p.voice_id))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().unwrap_or_default();
            log::warn!("ElevenLabs returned {status}: {message}");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(audio.to_vec())
    }
}
