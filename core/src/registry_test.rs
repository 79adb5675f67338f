use super::*;

fn known_codes() -> BTreeSet<String> {
    ["zu", "zul", "yo", "ha"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[test]
fn test_parse_listing_entry() {
    let json = r#"{
        "_id": "abc123",
        "id": "acme/whisper-african",
        "modelId": "acme/whisper-african",
        "likes": 12,
        "pipeline_tag": "automatic-speech-recognition",
        "tags": ["transformers", "pytorch", "zu", "yo", "license:mit"]
    }"#;

    let raw: RawModel = serde_json::from_str(json).unwrap();
    let descriptor = raw
        .into_descriptor(&known_codes(), "automatic-speech-recognition")
        .unwrap();

    assert_eq!(descriptor.model_id, "acme/whisper-african");
    assert_eq!(
        descriptor.declared_languages,
        ["yo", "zu"].iter().map(|c| c.to_string()).collect()
    );
    assert_eq!(descriptor.task_tag, "automatic-speech-recognition");
}

#[test]
fn test_parse_listing_array_ignores_unknown_fields() {
    let json = r#"[
        {"id": "a/one", "tags": ["zu"], "downloads": 99, "private": false},
        {"id": "b/two", "tags": ["ha"]}
    ]"#;

    let models: Vec<RawModel> = serde_json::from_str(json).unwrap();
    assert_eq!(models.len(), 2);
}

#[test]
fn test_language_prefix_tags_are_recognized() {
    let raw = RawModel {
        id: Some("c/three".to_string()),
        tags: vec!["language:zu".to_string(), "audio".to_string()],
        ..Default::default()
    };

    let descriptor = raw.into_descriptor(&known_codes(), "asr").unwrap();
    assert!(descriptor.declared_languages.contains("zu"));
}

#[test]
fn test_missing_id_is_metadata_missing() {
    let raw = RawModel {
        tags: vec!["zu".to_string()],
        ..Default::default()
    };

    let err = raw.into_descriptor(&known_codes(), "asr").unwrap_err();
    assert!(matches!(err, BenchError::MetadataMissing { .. }));
}

#[test]
fn test_no_language_tags_is_metadata_missing() {
    let raw = RawModel {
        id: Some("d/four".to_string()),
        tags: vec!["transformers".to_string(), "onnx".to_string()],
        ..Default::default()
    };

    let err = raw.into_descriptor(&known_codes(), "asr").unwrap_err();
    match err {
        BenchError::MetadataMissing { model } => assert_eq!(model, "d/four"),
        other => panic!("expected MetadataMissing, got {other:?}"),
    }
}

#[test]
fn test_missing_pipeline_tag_falls_back_to_query_task() {
    let raw = RawModel {
        id: Some("e/five".to_string()),
        tags: vec!["ha".to_string()],
        ..Default::default()
    };

    let descriptor = raw.into_descriptor(&known_codes(), "asr").unwrap();
    assert_eq!(descriptor.task_tag, "asr");
}

#[test]
fn test_merge_unions_declared_languages() {
    let mut a = ModelDescriptor {
        model_id: "f/six".to_string(),
        declared_languages: ["zu".to_string()].into_iter().collect(),
        task_tag: "asr".to_string(),
    };
    let b = ModelDescriptor {
        model_id: "f/six".to_string(),
        declared_languages: ["yo".to_string()].into_iter().collect(),
        task_tag: "asr".to_string(),
    };

    a.merge(b);

    assert_eq!(a.declared_languages.len(), 2);
    assert!(a.declares_any(&["yo".to_string()]));
    assert!(!a.declares_any(&["ha".to_string()]));
}
