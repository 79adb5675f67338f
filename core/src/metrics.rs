//! Corpus-level WER/CER computation.
//!
//! Error rates are pooled across a whole split: total edit operations over
//! total reference units. Averaging per-utterance rates would overweight
//! short utterances.

/// Levenshtein edit distance between two token sequences.
///
/// Counts the minimum number of substitutions, insertions, and deletions
/// needed to turn `hypothesis` into `reference`.
pub fn edit_distance<T: PartialEq>(reference: &[T], hypothesis: &[T]) -> usize {
    if reference.is_empty() {
        return hypothesis.len();
    }
    if hypothesis.is_empty() {
        return reference.len();
    }

    // Two-row dynamic programming over the edit lattice
    let mut prev: Vec<usize> = (0..=hypothesis.len()).collect();
    let mut curr = vec![0usize; hypothesis.len() + 1];

    for i in 1..=reference.len() {
        curr[0] = i;
        for j in 1..=hypothesis.len() {
            let cost = usize::from(reference[i - 1] != hypothesis[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[hypothesis.len()]
}

/// Running totals of edit operations against reference length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorTally {
    pub edits: usize,
    pub ref_units: usize,
}

impl ErrorTally {
    fn add(&mut self, edits: usize, ref_units: usize) {
        self.edits += edits;
        self.ref_units += ref_units;
    }

    /// Pooled error rate: total edits over total reference units.
    ///
    /// An empty reference with a non-empty hypothesis has no finite rate;
    /// this returns infinity rather than hiding the insertions.
    pub fn rate(&self) -> f64 {
        if self.ref_units == 0 {
            return if self.edits == 0 { 0.0 } else { f64::INFINITY };
        }
        self.edits as f64 / self.ref_units as f64
    }
}

/// Accumulates WER/CER counts across the utterances of one split.
#[derive(Debug, Clone, Default)]
pub struct CorpusMetrics {
    words: ErrorTally,
    chars: ErrorTally,
    samples: usize,
}

impl CorpusMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one utterance. Both sides must already be normalized.
    pub fn observe(&mut self, reference: &str, hypothesis: &str) {
        let ref_words: Vec<&str> = reference.split_whitespace().collect();
        let hyp_words: Vec<&str> = hypothesis.split_whitespace().collect();
        self.words
            .add(edit_distance(&ref_words, &hyp_words), ref_words.len());

        let ref_chars: Vec<char> = reference.chars().collect();
        let hyp_chars: Vec<char> = hypothesis.chars().collect();
        self.chars
            .add(edit_distance(&ref_chars, &hyp_chars), ref_chars.len());

        self.samples += 1;
    }

    /// Corpus word error rate.
    pub fn wer(&self) -> f64 {
        self.words.rate()
    }

    /// Corpus character error rate.
    pub fn cer(&self) -> f64 {
        self.chars.rate()
    }

    /// Number of utterances observed.
    pub fn sample_count(&self) -> usize {
        self.samples
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
