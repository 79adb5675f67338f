use super::*;
use tempfile::TempDir;

fn sample_matrix() -> SupportMatrix {
    let mut matrix = SupportMatrix::new(
        vec!["Zulu".to_string(), "Hausa".to_string()],
        vec![
            "acme/whisper-african".to_string(),
            "labs/mms-all".to_string(),
        ],
    );
    matrix.mark_supported("Zulu", "acme/whisper-african");
    matrix.mark_supported("Hausa", "labs/mms-all");
    matrix
}

#[test]
fn test_new_matrix_is_rectangular_and_unsupported() {
    let matrix = SupportMatrix::new(
        vec!["Zulu".to_string(), "Luo".to_string(), "Igbo".to_string()],
        vec!["a/one".to_string(), "b/two".to_string()],
    );

    assert_eq!(matrix.languages().len(), 3);
    assert_eq!(matrix.models().len(), 2);
    for language in matrix.languages() {
        for model in matrix.models() {
            assert_eq!(
                matrix.status(language, model),
                Some(&SupportStatus::Unsupported)
            );
        }
    }
}

#[test]
fn test_duplicates_are_dropped() {
    let matrix = SupportMatrix::new(
        vec!["Zulu".to_string(), "Zulu".to_string()],
        vec!["a/one".to_string(), "a/one".to_string(), "b/two".to_string()],
    );

    assert_eq!(matrix.languages(), ["Zulu"]);
    assert_eq!(matrix.models(), ["a/one", "b/two"]);
}

#[test]
fn test_set_unknown_axis_is_rejected() {
    let mut matrix = sample_matrix();

    assert!(!matrix.mark_supported("Klingon", "acme/whisper-african"));
    assert!(!matrix.mark_supported("Zulu", "nobody/nothing"));
}

#[test]
fn test_failure_annotation_excludes_pair_from_support() {
    let mut matrix = sample_matrix();
    assert!(matrix.is_supported("Zulu", "acme/whisper-african"));

    matrix.annotate_failure("Zulu", "acme/whisper-african", "decoder panic");

    assert!(!matrix.is_supported("Zulu", "acme/whisper-african"));
    assert_eq!(
        matrix.status("Zulu", "acme/whisper-african"),
        Some(&SupportStatus::Failed("decoder panic".to_string()))
    );
}

#[test]
fn test_supported_languages_per_model() {
    let matrix = sample_matrix();

    assert_eq!(matrix.supported_languages("acme/whisper-african"), ["Zulu"]);
    assert_eq!(matrix.supported_languages("labs/mms-all"), ["Hausa"]);
    assert_eq!(matrix.supported_model_count("Zulu"), 1);
}

#[test]
fn test_marker_round_trip() {
    for status in [
        SupportStatus::Supported,
        SupportStatus::Unsupported,
        SupportStatus::Failed("runtime crash on zu".to_string()),
    ] {
        let parsed = SupportStatus::parse_marker(&status.marker()).unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_marker_parsing_is_case_insensitive() {
    assert_eq!(
        SupportStatus::parse_marker("YES").unwrap(),
        SupportStatus::Supported
    );
    // Hand-edited annotations may capitalize the prefix; the note itself
    // keeps its case
    assert_eq!(
        SupportStatus::parse_marker("Error: Decoder crashed").unwrap(),
        SupportStatus::Failed("Decoder crashed".to_string())
    );
}

#[test]
fn test_unknown_marker_is_an_error() {
    assert!(SupportStatus::parse_marker("maybe").is_err());
}

#[test]
fn test_csv_round_trip() {
    let mut matrix = sample_matrix();
    matrix.annotate_failure("Hausa", "acme/whisper-african", "oom, chunk too large");

    let parsed = SupportMatrix::parse(&matrix.to_csv()).unwrap();

    assert_eq!(parsed, matrix);
}

#[test]
fn test_csv_header_shape() {
    let matrix = sample_matrix();
    let csv = matrix.to_csv();
    let mut lines = csv.lines();

    assert_eq!(
        lines.next().unwrap(),
        "language,acme/whisper-african,labs/mms-all"
    );
    // One row per language
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_note_with_comma_is_quoted() {
    let mut matrix = sample_matrix();
    matrix.annotate_failure("Zulu", "labs/mms-all", "bad state, retried once");

    let csv = matrix.to_csv();
    assert!(csv.contains("\"error: bad state, retried once\""));

    let parsed = SupportMatrix::parse(&csv).unwrap();
    assert_eq!(
        parsed.status("Zulu", "labs/mms-all"),
        Some(&SupportStatus::Failed("bad state, retried once".to_string()))
    );
}

#[test]
fn test_parse_rejects_ragged_rows() {
    let csv = "language,a/one,b/two\nZulu,yes\n";
    let result = SupportMatrix::parse(csv);
    assert!(result.is_err());
}

#[test]
fn test_parse_rejects_duplicate_language_rows() {
    let csv = "language,a/one\nZulu,yes\nZulu,no\n";
    assert!(SupportMatrix::parse(csv).is_err());
}

#[test]
fn test_parse_rejects_bad_header() {
    let csv = "model,a/one\nZulu,yes\n";
    assert!(SupportMatrix::parse(csv).is_err());
}

#[test]
fn test_write_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out").join("matrix.csv");

    let matrix = sample_matrix();
    matrix.write(&path).unwrap();
    let loaded = SupportMatrix::load(&path).unwrap();

    assert_eq!(loaded, matrix);
}

#[test]
fn test_split_record_handles_quotes() {
    let fields = split_record("plain,\"with, comma\",\"embedded \"\"quote\"\"\"").unwrap();
    assert_eq!(fields, ["plain", "with, comma", "embedded \"quote\""]);
}

#[test]
fn test_split_record_rejects_unterminated_quote() {
    assert!(split_record("\"oops").is_err());
}
