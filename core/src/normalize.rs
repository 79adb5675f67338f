//! Transcript normalization applied before scoring.
//!
//! Predictions and references go through the same transformation so WER/CER
//! measure recognition errors, not casing or punctuation conventions:
//! lowercase, drop punctuation, collapse whitespace runs.

/// Normalize a transcript for scoring.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hello, World!"), "hello world");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  one\ttwo \n three  "), "one two three");
    }

    #[test]
    fn test_intra_word_punctuation_is_dropped_not_split() {
        assert_eq!(normalize("don't"), "dont");
    }

    #[test]
    fn test_non_latin_text_is_preserved() {
        // Amharic script characters are alphanumeric
        assert_eq!(normalize("ሰላም ልዑል።"), "ሰላም ልዑል");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!... —"), "");
    }
}
