use super::*;
use tempfile::TempDir;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    // Eleven target languages, Zulu first
    assert_eq!(config.languages.len(), 11);
    assert_eq!(config.languages[0].name, "Zulu");
    assert_eq!(config.languages[0].codes, vec!["zu", "zul"]);

    assert_eq!(config.scrape.task, "automatic-speech-recognition");
    assert_eq!(config.scrape.api_base, "https://huggingface.co/api");
    assert_eq!(config.dataset.split, "test");
    assert_eq!(config.eval.max_samples, None);
    assert_eq!(
        config.output.matrix_path,
        PathBuf::from("asr_language_support_matrix.csv")
    );
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn test_load_valid_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sautibench.toml");

    let toml_content = r#"
[[languages]]
name = "Swahili"
codes = ["sw", "swa"]

[scrape]
limit = 10

[dataset]
root = "/srv/speech"
split = "dev"

[eval]
max_samples = 25

[eval.model_files]
"openai/whisper-small" = "ggml-small.bin"

[logging]
level = "debug"
"#;

    std::fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config.languages.len(), 1);
    assert_eq!(config.languages[0].name, "Swahili");
    assert_eq!(config.scrape.limit, 10);
    // Unspecified scrape fields keep defaults
    assert_eq!(config.scrape.task, "automatic-speech-recognition");
    assert_eq!(config.dataset.root, PathBuf::from("/srv/speech"));
    assert_eq!(config.dataset.split, "dev");
    assert_eq!(config.eval.max_samples, Some(25));
    assert_eq!(
        config.eval.model_file("openai/whisper-small"),
        "ggml-small.bin"
    );
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn test_missing_config_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent.toml");

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_toml_returns_error() {
    let invalid_toml = "this is not valid { toml [";

    let result = Config::parse(invalid_toml);

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("TOML"));
}

#[test]
fn test_save_and_reload_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("sautibench.toml");

    let mut config = Config::default();
    config.eval.max_samples = Some(5);
    config.dataset.split = "dev".to_string();

    config.save_to(&config_path).unwrap();
    let reloaded = Config::load_from(&config_path).unwrap();

    assert_eq!(reloaded, config);
}

#[test]
fn test_model_file_falls_back_to_default() {
    let config = Config::default();
    assert_eq!(config.eval.model_file("someone/some-model"), "ggml-model.bin");
}

#[test]
fn test_all_language_codes_unions_codes() {
    let config = Config::default();
    let codes = config.all_language_codes();

    assert!(codes.contains("zu"));
    assert!(codes.contains("zul"));
    assert!(codes.contains("wal"));
    // Two- and three-letter forms both counted once
    assert_eq!(codes.len(), 18);
}
