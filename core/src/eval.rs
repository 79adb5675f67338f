//! Evaluation pipeline.
//!
//! Iterates models on the outside and languages on the inside so each model
//! is loaded once, scores every supported (language, model) pair, and
//! contains failures to the pair they occurred on. Consumes the support
//! matrix and writes failure annotations back into it.

use crate::config::{Config, Language};
use crate::dataset;
use crate::error::BenchError;
use crate::matrix::SupportMatrix;
use crate::metrics::CorpusMetrics;
use crate::normalize::normalize;
use crate::transcribe::{ModelCache, Transcriber};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Scores for one evaluated (language, model) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub language: String,
    pub model: String,
    pub wer: f64,
    pub cer: f64,
    pub sample_count: usize,
}

/// Outcome of one (language, model) pair in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// Pair evaluated successfully.
    Scored(EvaluationResult),
    /// Inference or model load failed; the note goes into the output tables.
    Failed {
        language: String,
        model: String,
        note: String,
    },
    /// Pair could not be attempted (missing dataset, unconfigured language).
    Skipped {
        language: String,
        model: String,
        note: String,
    },
}

impl PairOutcome {
    pub fn language(&self) -> &str {
        match self {
            PairOutcome::Scored(result) => &result.language,
            PairOutcome::Failed { language, .. } | PairOutcome::Skipped { language, .. } => {
                language
            }
        }
    }

    pub fn model(&self) -> &str {
        match self {
            PairOutcome::Scored(result) => &result.model,
            PairOutcome::Failed { model, .. } | PairOutcome::Skipped { model, .. } => model,
        }
    }

    /// Error/skip note, if any.
    pub fn note(&self) -> Option<&str> {
        match self {
            PairOutcome::Scored(_) => None,
            PairOutcome::Failed { note, .. } | PairOutcome::Skipped { note, .. } => Some(note),
        }
    }
}

/// Progress events emitted during a batch, for UI display.
#[derive(Debug)]
pub enum EvalEvent<'a> {
    /// A pair is about to be evaluated.
    PairStarted {
        language: &'a str,
        model: &'a str,
        total_utterances: usize,
    },
    /// One utterance of the current pair finished.
    UtteranceDone { done: usize, total: usize },
    /// A pair finished with the given outcome.
    PairFinished { outcome: &'a PairOutcome },
}

/// Runs the evaluation batch over a support matrix.
pub struct Evaluator {
    languages: Vec<Language>,
    dataset_root: PathBuf,
    split: String,
    max_samples: Option<usize>,
}

impl Evaluator {
    /// Create an evaluator from the run configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            languages: config.languages.clone(),
            dataset_root: config.dataset.root.clone(),
            split: config.dataset.split.clone(),
            max_samples: config.eval.max_samples,
        }
    }

    /// Evaluate every pair the matrix marks supported.
    ///
    /// Each model is loaded once via the cache before its language loop and
    /// released after the last language. Runtime failures never abort the
    /// batch: they are recorded as outcomes and annotated into the matrix.
    pub fn run(
        &self,
        matrix: &mut SupportMatrix,
        cache: &mut ModelCache,
        mut on_event: impl FnMut(EvalEvent<'_>),
    ) -> Vec<PairOutcome> {
        let mut outcomes = Vec::new();
        let models: Vec<String> = matrix.models().to_vec();

        for model_id in models {
            let supported = matrix.supported_languages(&model_id);
            if supported.is_empty() {
                debug!(model = %model_id, "No supported languages, skipping model");
                continue;
            }

            let transcriber = match cache.load(&model_id) {
                Ok(transcriber) => transcriber,
                Err(err) => {
                    let note = format!("model load failed: {err:#}");
                    warn!(model = %model_id, error = %note, "Failing all pairs of this model");
                    for language in supported {
                        matrix.annotate_failure(&language, &model_id, &note);
                        let outcome = PairOutcome::Failed {
                            language,
                            model: model_id.clone(),
                            note: note.clone(),
                        };
                        on_event(EvalEvent::PairFinished { outcome: &outcome });
                        outcomes.push(outcome);
                    }
                    continue;
                }
            };

            for language_name in supported {
                let outcome =
                    self.evaluate_pair(&language_name, &model_id, &mut *transcriber, &mut on_event);

                if let PairOutcome::Failed { note, .. } = &outcome {
                    matrix.annotate_failure(&language_name, &model_id, note);
                }
                on_event(EvalEvent::PairFinished { outcome: &outcome });
                outcomes.push(outcome);
            }

            cache.release(&model_id);
        }

        info!(pairs = outcomes.len(), "Evaluation batch finished");
        outcomes
    }

    fn evaluate_pair(
        &self,
        language_name: &str,
        model_id: &str,
        transcriber: &mut dyn Transcriber,
        on_event: &mut impl FnMut(EvalEvent<'_>),
    ) -> PairOutcome {
        let Some(language) = self.languages.iter().find(|l| l.name == language_name) else {
            warn!(language = language_name, "Language not in configuration, skipping");
            return PairOutcome::Skipped {
                language: language_name.to_string(),
                model: model_id.to_string(),
                note: "language not configured".to_string(),
            };
        };
        let Some(code) = language.codes.first() else {
            return PairOutcome::Skipped {
                language: language_name.to_string(),
                model: model_id.to_string(),
                note: "language has no codes configured".to_string(),
            };
        };

        let mut utterances = match dataset::load_split(&self.dataset_root, code, &self.split) {
            Ok(utterances) => utterances,
            Err(err) => {
                warn!(
                    language = language_name,
                    model = model_id,
                    error = %err,
                    "Dataset unavailable, skipping pair"
                );
                return PairOutcome::Skipped {
                    language: language_name.to_string(),
                    model: model_id.to_string(),
                    note: err.to_string(),
                };
            }
        };
        if let Some(cap) = self.max_samples {
            utterances.truncate(cap);
        }
        if utterances.is_empty() {
            return PairOutcome::Skipped {
                language: language_name.to_string(),
                model: model_id.to_string(),
                note: "split contains no utterances".to_string(),
            };
        }

        let total = utterances.len();
        on_event(EvalEvent::PairStarted {
            language: language_name,
            model: model_id,
            total_utterances: total,
        });
        info!(
            language = language_name,
            model = model_id,
            utterances = total,
            "Evaluating pair"
        );

        let mut metrics = CorpusMetrics::new();
        for (index, utterance) in utterances.iter().enumerate() {
            let prediction = match transcriber.transcribe(
                &utterance.audio.samples,
                utterance.audio.sample_rate,
                Some(code),
            ) {
                Ok(prediction) => prediction,
                Err(err) => {
                    let err = BenchError::Inference {
                        model: model_id.to_string(),
                        language: language_name.to_string(),
                        message: format!("{err:#}"),
                    };
                    warn!(error = %err, "Inference failure, aborting pair");
                    return PairOutcome::Failed {
                        language: language_name.to_string(),
                        model: model_id.to_string(),
                        note: err.to_string(),
                    };
                }
            };

            metrics.observe(&normalize(&utterance.reference_text), &normalize(&prediction));
            on_event(EvalEvent::UtteranceDone {
                done: index + 1,
                total,
            });
        }

        PairOutcome::Scored(EvaluationResult {
            language: language_name.to_string(),
            model: model_id.to_string(),
            wer: metrics.wer(),
            cer: metrics.cer(),
            sample_count: metrics.sample_count(),
        })
    }
}

#[cfg(test)]
#[path = "eval_test.rs"]
mod tests;
