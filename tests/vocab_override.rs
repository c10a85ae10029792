use std::fs;

use reentry_keys::{Dimension, VocabLoadError, VocabOverride, Vocabulary};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn write_override(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn default_vocabulary_matches_conformance_contents() {
    let vocab = Vocabulary::load_default();
    assert!(vocab.contains(Dimension::Duration, "FLASH"));
    assert!(vocab.contains(Dimension::Proximity, "AT_EVENT"));
    assert!(vocab.contains(Dimension::Outcome, "W1"));
    assert_eq!(vocab.generation_min(), 1);
    assert!(vocab.generation_max() >= 2);
    for dimension in Dimension::ALL {
        assert!(!vocab.codes(dimension).is_empty());
    }
}

#[test]
fn override_file_replaces_listed_dimensions_and_bounds() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = write_override(
        &dir,
        "override.json",
        r#"{
            "duration": ["FLASH", "SUSTAINED"],
            "generation_max": 8
        }"#,
    );
    let vocab = Vocabulary::load_with_override_file(&path).unwrap();
    assert!(vocab.contains(Dimension::Duration, "SUSTAINED"));
    assert!(!vocab.contains(Dimension::Duration, "MEDIUM"));
    // Dimensions absent from the override keep the defaults.
    assert!(vocab.contains(Dimension::Outcome, "W1"));
    assert_eq!(vocab.generation_min(), 1);
    assert_eq!(vocab.generation_max(), 8);
}

#[test]
fn malformed_override_sources_are_load_errors() {
    let dir = TempDir::new().unwrap();

    let not_json = write_override(&dir, "broken.json", "{ not json");
    assert!(matches!(
        Vocabulary::load_with_override_file(&not_json).unwrap_err(),
        VocabLoadError::Malformed(_)
    ));

    let unknown_key = write_override(&dir, "unknown.json", r#"{ "severity": ["HIGH"] }"#);
    assert!(matches!(
        Vocabulary::load_with_override_file(&unknown_key).unwrap_err(),
        VocabLoadError::Malformed(_)
    ));

    let wrong_shape = write_override(&dir, "shape.json", r#"{ "duration": "FLASH" }"#);
    assert!(matches!(
        Vocabulary::load_with_override_file(&wrong_shape).unwrap_err(),
        VocabLoadError::Malformed(_)
    ));

    let missing = dir.path().join("nope.json");
    assert!(matches!(
        Vocabulary::load_with_override_file(&missing).unwrap_err(),
        VocabLoadError::Io(_)
    ));
}

#[test]
fn inconsistent_override_contents_are_load_errors() {
    let dir = TempDir::new().unwrap();

    let empty_dimension = write_override(&dir, "empty.json", r#"{ "outcome": [] }"#);
    assert!(matches!(
        Vocabulary::load_with_override_file(&empty_dimension).unwrap_err(),
        VocabLoadError::EmptyDimension {
            dimension: Dimension::Outcome
        }
    ));

    let inverted = write_override(
        &dir,
        "inverted.json",
        r#"{ "generation_min": 5, "generation_max": 2 }"#,
    );
    assert!(matches!(
        Vocabulary::load_with_override_file(&inverted).unwrap_err(),
        VocabLoadError::InvertedGenerationBounds { min: 5, max: 2 }
    ));
}

#[test]
fn in_memory_override_source_needs_no_file() {
    let vocab = Vocabulary::load_with_override(&VocabOverride {
        direction: Some(vec!["UP".into(), "DOWN".into()]),
        ..VocabOverride::default()
    })
    .unwrap();
    assert!(vocab.contains(Dimension::Direction, "UP"));
    assert!(!vocab.contains(Dimension::Direction, "LONG"));
}

#[test]
fn shared_default_is_lazily_built_once() {
    let first = Vocabulary::default_shared();
    let second = Vocabulary::default_shared();
    assert!(std::ptr::eq(first, second));
    assert_eq!(*first, Vocabulary::load_default());
}
