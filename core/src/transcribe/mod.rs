//! Speech-to-text transcription.
//!
//! This module provides a trait abstraction for transcription backends,
//! the Whisper implementation, and the model cache used by the evaluation
//! loop to scope model lifetimes.

use anyhow::Result;

mod cache;
mod whisper;

pub use cache::{ModelCache, TranscriberFactory};
pub use whisper::{WhisperFactory, WhisperTranscriber};

/// Speech-to-text transcriber.
///
/// Implementations convert audio samples to text.
pub trait Transcriber: Send {
    /// Transcribe audio samples to text.
    ///
    /// # Arguments
    /// * `audio` - Audio samples as f32, expected to be 16kHz mono
    /// * `sample_rate` - Sample rate of the audio in Hz (must be 16000)
    /// * `language` - Language code hint (e.g., "zu") or None for auto-detect
    ///
    /// # Returns
    /// The transcribed text, or an error if transcription failed.
    fn transcribe(
        &mut self,
        audio: &[f32],
        sample_rate: u32,
        language: Option<&str>,
    ) -> Result<String>;
}

impl std::fmt::Debug for dyn Transcriber + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Transcriber")
    }
}
