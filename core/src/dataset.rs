//! Dataset split loading.
//!
//! A split lives at `<root>/<language-code>/<split>/` and contains a
//! `transcripts.tsv` (one `<wav-file>\t<reference text>` line per utterance)
//! next to the WAV files it names. Utterances come back as 16kHz mono.

use crate::audio::{self, AudioBuffer};
use crate::error::{BenchError, BenchResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Transcript index file name inside a split directory.
pub const TRANSCRIPTS_FILE: &str = "transcripts.tsv";

/// One dataset utterance: audio plus its reference transcript.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub audio: AudioBuffer,
    pub reference_text: String,
}

/// Directory of a language/split pair under the dataset root.
pub fn split_dir(root: &Path, language_code: &str, split: &str) -> PathBuf {
    root.join(language_code).join(split)
}

/// Load all utterances of a split.
///
/// Returns [`BenchError::DatasetMissing`] when the split directory or its
/// transcript index is absent. Individual malformed lines or unreadable WAV
/// files are skipped with a warning.
pub fn load_split(root: &Path, language_code: &str, split: &str) -> BenchResult<Vec<Utterance>> {
    let dir = split_dir(root, language_code, split);
    let transcripts_path = dir.join(TRANSCRIPTS_FILE);
    if !transcripts_path.exists() {
        return Err(BenchError::DatasetMissing {
            language: language_code.to_string(),
            split: split.to_string(),
            path: dir,
        });
    }

    let content = std::fs::read_to_string(&transcripts_path)?;
    let mut utterances = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((file, text)) = line.split_once('\t') else {
            warn!(
                path = %transcripts_path.display(),
                line = lineno + 1,
                "Malformed transcript line (no tab), skipping"
            );
            continue;
        };

        let wav_path = dir.join(file.trim());
        match load_utterance(&wav_path, text.trim()) {
            Ok(utterance) => utterances.push(utterance),
            Err(err) => {
                warn!(
                    path = %wav_path.display(),
                    error = %err,
                    "Skipping unreadable audio file"
                );
            }
        }
    }

    debug!(
        language = language_code,
        split = split,
        utterances = utterances.len(),
        "Loaded dataset split"
    );
    Ok(utterances)
}

fn load_utterance(wav_path: &Path, reference_text: &str) -> BenchResult<Utterance> {
    let buffer = load_wav(wav_path)?;
    let buffer = audio::resample_to_target(buffer)
        .map_err(|err| BenchError::Audio(format!("{err:#}")))?;
    Ok(Utterance {
        audio: buffer,
        reference_text: reference_text.to_string(),
    })
}

/// Load a WAV file as mono f32 at its native sample rate.
pub fn load_wav(path: &Path) -> BenchResult<AudioBuffer> {
    let mut reader =
        hound::WavReader::open(path).map_err(|err| BenchError::Audio(err.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| BenchError::Audio(err.to_string()))?,
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32768.0))
            .collect::<Result<_, _>>()
            .map_err(|err| BenchError::Audio(err.to_string()))?,
    };

    let mono = audio::to_mono(&samples, spec.channels);
    Ok(AudioBuffer::new(mono, spec.sample_rate))
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
