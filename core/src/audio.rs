//! Audio buffer handling for dataset utterances.
//!
//! Dataset WAVs arrive at arbitrary sample rates and channel counts; the
//! transcription backends expect 16kHz mono f32. This module downmixes and
//! resamples whole utterance buffers.

use anyhow::{Context, Result};
use audioadapter_buffers::direct::SequentialSliceOfVecs;
use rubato::audioadapter::Adapter;
use rubato::{Fft, FixedSync, Resampler};

/// Target sample rate for speech recognition models.
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Audio buffer containing mono f32 samples at a known sample rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration of the buffer in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Convert multi-channel interleaved samples to mono by averaging all channels.
pub fn to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resampler for converting audio between sample rates.
pub struct AudioResampler {
    resampler: Fft<f32>,
    chunk_size_in: usize,
    input_rate: u32,
    output_rate: u32,
}

impl AudioResampler {
    /// Create a new resampler.
    ///
    /// # Arguments
    /// * `input_rate` - Input sample rate in Hz
    /// * `output_rate` - Output sample rate in Hz
    /// * `chunk_size` - Number of input samples per processing chunk
    pub fn new(input_rate: u32, output_rate: u32, chunk_size: usize) -> Result<Self> {
        let resampler = Fft::new(
            input_rate as usize,
            output_rate as usize,
            chunk_size,
            1, // sub_chunks
            1, // channels
            FixedSync::Input,
        )
        .context("Failed to create resampler")?;

        Ok(Self {
            resampler,
            chunk_size_in: chunk_size,
            input_rate,
            output_rate,
        })
    }

    /// Resample a whole buffer.
    ///
    /// The final partial chunk is zero-padded to the chunk size. The FFT
    /// resampler has a group delay, so the leading delay frames are skipped
    /// and extra silence is fed in until the utterance tail has been
    /// flushed; the output is then trimmed to the length implied by the
    /// rate ratio.
    pub fn process_all(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let expected_len =
            (input.len() as u64 * u64::from(self.output_rate) / u64::from(self.input_rate)) as usize;
        let delay = self.resampler.output_delay();

        let mut output = Vec::with_capacity(delay + expected_len + self.chunk_size_in);
        for chunk in input.chunks(self.chunk_size_in) {
            let mut padded = chunk.to_vec();
            padded.resize(self.chunk_size_in, 0.0);
            self.process_chunk(padded, &mut output)?;
        }
        while output.len() < delay + expected_len {
            self.process_chunk(vec![0.0; self.chunk_size_in], &mut output)?;
        }

        output.drain(..delay);
        output.truncate(expected_len);
        Ok(output)
    }

    fn process_chunk(&mut self, padded: Vec<f32>, output: &mut Vec<f32>) -> Result<()> {
        let input_vecs = vec![padded];
        let input_adapter = SequentialSliceOfVecs::new(&input_vecs, 1, self.chunk_size_in)
            .expect("valid input");
        let resampled = self
            .resampler
            .process(&input_adapter, 0, None)
            .context("Resampling failed")?;

        for frame_idx in 0..resampled.frames() {
            output.push(resampled.read_sample(0, frame_idx).unwrap_or(0.0));
        }
        Ok(())
    }
}

/// Resample a buffer to [`TARGET_SAMPLE_RATE`] if it isn't there already.
pub fn resample_to_target(buffer: AudioBuffer) -> Result<AudioBuffer> {
    if buffer.sample_rate == TARGET_SAMPLE_RATE {
        return Ok(buffer);
    }

    let mut resampler = AudioResampler::new(buffer.sample_rate, TARGET_SAMPLE_RATE, 1024)?;
    let samples = resampler.process_all(&buffer.samples)?;
    Ok(AudioBuffer::new(samples, TARGET_SAMPLE_RATE))
}

#[cfg(test)]
#[path = "audio_test.rs"]
mod tests;
