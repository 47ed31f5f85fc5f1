//! # voiceover-rs
//!
//! Batch text-to-speech for voice-over work: every line of a script or
//! subtitle file becomes one audio clip, and the clips are bundled into a zip.
//!
//! ## Features
//!
//! - **Line cleanup**: terminal punctuation, whitespace collapsing and a pause
//!   comma for long lines ([`text`])
//! - **Pronunciation dictionary**: whole-word respelling from a JSON file
//!   ([`dictionary`])
//! - **Key rotation**: a ledger of API keys with per-key word quotas
//!   ([`ledger`])
//! - **Input formats**: pasted text, `.txt` and `.srt` files ([`input`])
//! - **ElevenLabs engine**: enabled by the default `elevenlabs` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use voiceover_rs::{
//!     dictionary::PronunciationDict,
//!     driver::SynthesisDriver,
//!     engines::elevenlabs::ElevenLabsEngine,
//!     input::InputSource,
//!     ledger::FileLedger,
//! };
//!
//! let lines = InputSource::Pasted("Hello world\nSecond line".into()).extract_lines();
//! let mut driver = SynthesisDriver::new(
//!     ElevenLabsEngine::new()?,
//!     FileLedger::new("api_keys.json"),
//!     PronunciationDict::load(Path::new("pronunciation_dict.json")),
//! );
//!
//! let report = driver.run(&lines, |_| {})?;
//! std::fs::write("tts_output.zip", &report.archive)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
#[cfg(feature = "elevenlabs")]
pub mod config;
pub mod dictionary;
pub mod driver;
pub mod engines;
pub mod error;
pub mod input;
pub mod ledger;
pub mod text;

pub use error::{ProviderError, RunError};

/// One successfully synthesized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    /// 1-based position of the line in the run.
    pub index: usize,
    /// Encoded audio exactly as returned by the engine.
    pub audio: Vec<u8>,
    /// The line as extracted from the input.
    pub source_line: String,
    /// The text actually sent, after cleanup and pronunciation rules.
    pub text: String,
    /// Words charged to the ledger for this line.
    pub word_count: usize,
}

impl SynthesisResult {
    /// Write the clip to a file as-is.
    pub fn write_audio(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, &self.audio)
    }

    /// Size of the clip in bytes.
    pub fn size_bytes(&self) -> usize {
        self.audio.len()
    }
}

/// Common interface for remote text-to-speech engines.
///
/// Engines are stateless with respect to credentials: the key to bill is
/// passed on every call so the caller can rotate keys between lines.
pub trait SynthesisEngine {
    /// Parameters for configuring a request (voice, model, tuning).
    type SynthesisParams: Clone + Default;

    /// Synthesize speech for `text`, billed to `api_key`.
    ///
    /// Returns the encoded audio on success. `None` params use the engine's
    /// defaults.
    fn synthesize(
        &mut self,
        text: &str,
        api_key: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<Vec<u8>, ProviderError>;
}
