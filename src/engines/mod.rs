//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines.
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `elevenlabs` - ElevenLabs REST API (default)

#[cfg(feature = "elevenlabs")]
pub mod elevenlabs;
