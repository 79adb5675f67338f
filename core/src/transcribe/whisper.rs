//! Whisper transcription backend.
//!
//! Uses whisper.cpp via whisper-rs for speech-to-text.

use super::{Transcriber, TranscriberFactory};
use crate::error::BenchError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper speech-to-text transcriber.
///
/// Owns its context so dropping the transcriber releases the model weights;
/// a fresh decoding state is created per utterance. A benchmark batch loads
/// and unloads several models in sequence, so the model must actually free
/// when the cache releases it.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber.
    ///
    /// # Arguments
    /// * `model_path` - Path to the Whisper GGML model file
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self> {
        info!(
            path = %model_path.as_ref().display(),
            "Loading Whisper model"
        );

        let ctx = WhisperContext::new_with_params(
            model_path.as_ref().to_str().context("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .context("Failed to load Whisper model")?;

        info!("Whisper model loaded");

        Ok(Self { ctx })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(
        &mut self,
        audio: &[f32],
        sample_rate: u32,
        language: Option<&str>,
    ) -> Result<String> {
        debug!(
            samples = audio.len(),
            sample_rate = sample_rate,
            duration_secs = audio.len() as f32 / sample_rate as f32,
            language = ?language,
            "Transcribing audio with Whisper"
        );

        // Whisper expects 16kHz audio
        if sample_rate != 16000 {
            anyhow::bail!(
                "Whisper expects 16kHz audio, got {}Hz. Resample before calling transcribe.",
                sample_rate
            );
        }

        let mut state = self
            .ctx
            .create_state()
            .context("Failed to create Whisper state")?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(language);
        params.set_translate(false);

        // Disable printing to stdout
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, audio)
            .context("Whisper inference failed")?;

        // Collect all segments
        let num_segments = state.full_n_segments();
        let mut result = String::new();

        for i in 0..num_segments {
            if let Some(segment) = state.get_segment(i) {
                if let Ok(text) = segment.to_str_lossy() {
                    result.push_str(&text);
                }
            }
        }

        debug!(text_len = result.len(), "Transcription complete");

        Ok(result.trim().to_string())
    }
}

/// Creates [`WhisperTranscriber`]s from pre-resolved local weight files.
#[derive(Debug, Default)]
pub struct WhisperFactory {
    model_paths: HashMap<String, PathBuf>,
}

impl WhisperFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the local weights file for a hub model id.
    pub fn insert(&mut self, model_id: impl Into<String>, path: impl Into<PathBuf>) {
        self.model_paths.insert(model_id.into(), path.into());
    }

    /// Whether a model id has a registered weights file.
    pub fn contains(&self, model_id: &str) -> bool {
        self.model_paths.contains_key(model_id)
    }
}

impl TranscriberFactory for WhisperFactory {
    fn create(&self, model_id: &str) -> Result<Box<dyn Transcriber>> {
        let path = self
            .model_paths
            .get(model_id)
            .ok_or_else(|| BenchError::UnknownModel {
                model: model_id.to_string(),
            })?;
        let transcriber = WhisperTranscriber::new(path)
            .with_context(|| format!("Failed to load model {model_id}"))?;
        Ok(Box::new(transcriber))
    }
}
