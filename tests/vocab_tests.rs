//! Integration tests for vocabulary loading and the provider, exercising the
//! on-disk JSON path end to end.

use std::fs;
use std::path::PathBuf;

use irvec::{load_vocabulary, Embedding, VocabConfig, VocabError, VocabProvider};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write `contents` to a per-test temp file and return its path.
fn write_temp_vocab(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "irvec-vocab-{}-{}.json",
        tag,
        std::process::id()
    ));
    fs::write(&path, contents).unwrap();
    path
}

const SAMPLE_VOCAB: &str = r#"{
  "Opcodes": {"add": [2.0, 4.0], "ret": [6.0, 8.0]},
  "Types": {"integerTy": [2.0, 4.0], "voidTy": [6.0, 8.0]},
  "Arguments": {"variable": [2.0, 4.0], "constant": [6.0, 8.0]}
}"#;

#[test]
fn test_load_from_file_applies_section_weights() {
    init_logging();
    let path = write_temp_vocab("weights", SAMPLE_VOCAB);
    let vocab = load_vocabulary(&VocabConfig::with_path(&path)).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(vocab.len(), 6);
    assert_eq!(vocab.dimension(), 2);

    // Opcode weight 1.0: stored as-is.
    assert_eq!(
        vocab.get("add").unwrap(),
        &Embedding::from(vec![2.0, 4.0])
    );
    // Type weight 0.5.
    assert_eq!(
        vocab.get("integerTy").unwrap(),
        &Embedding::from(vec![1.0, 2.0])
    );
    // Argument weight 0.2.
    assert!(vocab
        .get("variable")
        .unwrap()
        .approx_eq(&Embedding::from(vec![0.4, 0.8]), Embedding::DEFAULT_TOLERANCE));
}

#[test]
fn test_load_with_custom_weights() {
    init_logging();
    let path = write_temp_vocab("custom-weights", SAMPLE_VOCAB);
    let config = VocabConfig {
        path: Some(path.clone()),
        opcode_weight: 2.0,
        type_weight: 1.0,
        arg_weight: 0.5,
    };
    let vocab = load_vocabulary(&config).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(vocab.get("ret").unwrap(), &Embedding::from(vec![12.0, 16.0]));
    assert_eq!(
        vocab.get("voidTy").unwrap(),
        &Embedding::from(vec![6.0, 8.0])
    );
    assert_eq!(
        vocab.get("constant").unwrap(),
        &Embedding::from(vec![3.0, 4.0])
    );
}

#[test]
fn test_merge_prefers_later_sections() {
    init_logging();
    // "shared" appears in all three sections; the Arguments entry wins
    // because sections merge in Opcodes, Types, Arguments order.
    let doc = r#"{
      "Opcodes": {"shared": [9.0, 9.0]},
      "Types": {"shared": [5.0, 5.0]},
      "Arguments": {"shared": [1.0, 2.0]}
    }"#;
    let path = write_temp_vocab("merge-order", doc);
    let config = VocabConfig {
        path: Some(path.clone()),
        opcode_weight: 1.0,
        type_weight: 1.0,
        arg_weight: 1.0,
    };
    let vocab = load_vocabulary(&config).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(vocab.len(), 1);
    assert_eq!(
        vocab.get("shared").unwrap(),
        &Embedding::from(vec![1.0, 2.0])
    );
}

#[test]
fn test_load_without_path() {
    init_logging();
    let err = load_vocabulary(&VocabConfig::default()).unwrap_err();
    assert!(matches!(err, VocabError::PathNotConfigured));
}

#[test]
fn test_load_missing_file() {
    init_logging();
    let config = VocabConfig::with_path("/nonexistent/irvec-vocab.json");
    let err = load_vocabulary(&config).unwrap_err();
    assert!(matches!(err, VocabError::Io { .. }));
}

#[test]
fn test_load_invalid_json() {
    init_logging();
    let path = write_temp_vocab("invalid-json", "{not json");
    let err = load_vocabulary(&VocabConfig::with_path(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, VocabError::Json(_)));
}

#[test]
fn test_load_root_not_object() {
    init_logging();
    let path = write_temp_vocab("root-array", "[1, 2, 3]");
    let err = load_vocabulary(&VocabConfig::with_path(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, VocabError::RootNotObject));
}

#[test]
fn test_load_missing_section() {
    init_logging();
    let doc = r#"{
      "Opcodes": {"add": [1.0]},
      "Arguments": {"variable": [1.0]}
    }"#;
    let path = write_temp_vocab("missing-section", doc);
    let err = load_vocabulary(&VocabConfig::with_path(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, VocabError::MissingSection { section: "Types" }));
}

#[test]
fn test_load_empty_section() {
    init_logging();
    let doc = r#"{
      "Opcodes": {},
      "Types": {"voidTy": [1.0]},
      "Arguments": {"variable": [1.0]}
    }"#;
    let path = write_temp_vocab("empty-section", doc);
    let err = load_vocabulary(&VocabConfig::with_path(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, VocabError::EmptySection { .. }));
}

#[test]
fn test_load_inconsistent_dimension_within_section() {
    init_logging();
    let doc = r#"{
      "Opcodes": {"add": [1.0, 2.0], "ret": [1.0, 2.0, 3.0]},
      "Types": {"voidTy": [1.0, 2.0]},
      "Arguments": {"variable": [1.0, 2.0]}
    }"#;
    let path = write_temp_vocab("inconsistent", doc);
    let err = load_vocabulary(&VocabConfig::with_path(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, VocabError::InconsistentDimension { .. }));
}

#[test]
fn test_load_cross_section_dimension_mismatch() {
    init_logging();
    let doc = r#"{
      "Opcodes": {"add": [1.0, 2.0]},
      "Types": {"voidTy": [1.0, 2.0, 3.0]},
      "Arguments": {"variable": [1.0, 2.0]}
    }"#;
    let path = write_temp_vocab("cross-section", doc);
    let err = load_vocabulary(&VocabConfig::with_path(&path)).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, VocabError::SectionDimensionMismatch));
}

#[test]
fn test_provider_load_propagates_errors() {
    init_logging();
    let err = VocabProvider::load(&VocabConfig::default()).unwrap_err();
    assert!(matches!(err, VocabError::PathNotConfigured));
}

#[test]
fn test_provider_run_degrades_to_invalid() {
    init_logging();
    let config = VocabConfig::with_path("/nonexistent/irvec-vocab.json");
    let provider = VocabProvider::run(&config);
    assert!(!provider.is_valid());
}

#[test]
fn test_provider_run_with_valid_file() {
    init_logging();
    let path = write_temp_vocab("provider-run", SAMPLE_VOCAB);
    let provider = VocabProvider::run(&VocabConfig::with_path(&path));
    fs::remove_file(&path).unwrap();

    assert!(provider.is_valid());
    assert_eq!(provider.dimension(), 2);
    assert!(provider.vocabulary().get("add").is_some());
}

#[test]
fn test_provider_invalidate_and_replace() {
    init_logging();
    let path = write_temp_vocab("provider-replace", SAMPLE_VOCAB);
    let mut provider = VocabProvider::run(&VocabConfig::with_path(&path));
    assert!(provider.is_valid());

    provider.invalidate();
    assert!(!provider.is_valid());

    let vocab = load_vocabulary(&VocabConfig::with_path(&path)).unwrap();
    fs::remove_file(&path).unwrap();
    provider.replace(vocab);
    assert!(provider.is_valid());
}

#[test]
#[should_panic(expected = "invalid provider")]
fn test_invalid_provider_panics_on_access() {
    init_logging();
    let provider = VocabProvider::invalid();
    let _ = provider.vocabulary();
}
