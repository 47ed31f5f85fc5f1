//! Settings for a voice-over run and the wiring that turns them into a
//! ready-to-use [`SynthesisDriver`].
//!
//! ```rust,no_run
//! use voiceover_rs::config::VoiceoverConfigBuilder;
//!
//! let config = VoiceoverConfigBuilder::default()
//!     .voice_id("TxGEqnHWrfWFTfGW9XjX")
//!     .quota(5_000u64)
//!     .build()?;
//! let driver = config.driver()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;

use crate::dictionary::{PronunciationDict, DEFAULT_DICTIONARY_PATH};
use crate::driver::{SynthesisDriver, DEFAULT_ARCHIVE_EXTENSION};
use crate::engines::elevenlabs::{
    voices, ElevenLabsEngine, ElevenLabsParams, VoiceSettings, DEFAULT_BASE_URL, DEFAULT_MODEL_ID,
};
use crate::error::ProviderError;
use crate::ledger::{FileLedger, DEFAULT_LEDGER_PATH, DEFAULT_QUOTA};

/// Default name of the produced archive.
pub const DEFAULT_OUTPUT_PATH: &str = "tts_output.zip";

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct VoiceoverConfig {
    /// JSON file holding the API keys and their usage.
    #[builder(setter(into))]
    pub ledger_path: PathBuf,
    /// Optional JSON pronunciation dictionary.
    #[builder(setter(into))]
    pub dictionary_path: PathBuf,
    /// Where the finished zip is written.
    #[builder(setter(into))]
    pub output_path: PathBuf,
    /// API root, without the `/v1/...` suffix.
    #[builder(setter(into))]
    pub base_url: String,
    /// Per-request timeout. `None` waits for the provider.
    #[builder(setter(strip_option))]
    pub request_timeout: Option<Duration>,
    #[builder(setter(into))]
    pub voice_id: String,
    #[builder(setter(into))]
    pub model_id: String,
    pub voice_settings: VoiceSettings,
    /// Words each key may be charged before rotation moves past it.
    pub quota: u64,
    /// Extension of the clips inside the archive.
    #[builder(setter(into))]
    pub archive_extension: String,
}

impl Default for VoiceoverConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            voice_id: voices::default_voice().voice_id.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            voice_settings: VoiceSettings::default(),
            quota: DEFAULT_QUOTA,
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
        }
    }
}

impl VoiceoverConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.quota == Some(0) {
            return Err("quota must be greater than zero".to_string());
        }
        if self.voice_id.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err("voice id must not be empty".to_string());
        }
        if self
            .archive_extension
            .as_deref()
            .is_some_and(|e| e.is_empty() || e.contains(['/', '\\', '.']))
        {
            return Err("archive extension must be a bare extension like \"mp3\"".to_string());
        }
        Ok(())
    }
}

impl VoiceoverConfig {
    /// Request parameters shared by every line of a run.
    pub fn params(&self) -> ElevenLabsParams {
        ElevenLabsParams {
            voice_id: self.voice_id.clone(),
            model_id: self.model_id.clone(),
            voice_settings: self.voice_settings,
        }
    }

    pub fn engine(&self) -> Result<ElevenLabsEngine, ProviderError> {
        ElevenLabsEngine::with_endpoint(self.base_url.as_str(), self.request_timeout)
    }

    pub fn ledger(&self) -> FileLedger {
        FileLedger::with_quota(&self.ledger_path, self.quota)
    }

    /// Load the pronunciation dictionary, empty if the file is absent or invalid.
    pub fn dictionary(&self) -> PronunciationDict {
        PronunciationDict::load(&self.dictionary_path)
    }

    /// Build a driver with the engine, ledger, dictionary and parameters from
    /// this configuration.
    pub fn driver(&self) -> Result<SynthesisDriver<ElevenLabsEngine, FileLedger>, ProviderError> {
        Ok(
            SynthesisDriver::new(self.engine()?, self.ledger(), self.dictionary())
                .with_params(self.params())
                .with_archive_extension(self.archive_extension.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CredentialLedger;

    #[test]
    fn defaults_match_constants() {
        let config = VoiceoverConfigBuilder::default().build().unwrap();
        assert_eq!(config, VoiceoverConfig::default());
        assert_eq!(config.quota, 10_000);
        assert_eq!(config.model_id, "eleven_flash_v2_5");
        assert_eq!(config.voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(config.ledger_path, PathBuf::from("api_keys.json"));
    }

    #[test]
    fn rejects_zero_quota() {
        assert!(VoiceoverConfigBuilder::default().quota(0u64).build().is_err());
    }

    #[test]
    fn rejects_bad_extension() {
        assert!(VoiceoverConfigBuilder::default()
            .archive_extension("../x")
            .build()
            .is_err());
    }

    #[test]
    fn quota_flows_into_ledger() {
        let config = VoiceoverConfigBuilder::default()
            .quota(3u64)
            .ledger_path("keys.json")
            .build()
            .unwrap();
        let ledger = config.ledger();
        assert_eq!(ledger.quota(), 3);
        assert_eq!(ledger.path(), std::path::Path::new("keys.json"));
    }

    #[test]
    fn params_carry_voice_and_settings() {
        let config = VoiceoverConfigBuilder::default()
            .voice_id("abc")
            .voice_settings(VoiceSettings {
                stability: 0.2,
                ..VoiceSettings::default()
            })
            .build()
            .unwrap();
        let params = config.params();
        assert_eq!(params.voice_id, "abc");
        assert_eq!(params.voice_settings.stability, 0.2);
        assert_eq!(params.model_id, DEFAULT_MODEL_ID);
    }
}
