// This module defines error types for vocabulary acquisition using the thiserror crate
// for idiomatic Rust error handling. VocabError is the main error enum covering the
// failure scenarios of loading and validating a vocabulary document: missing path
// configuration, file I/O failures, JSON syntax errors, and schema violations (missing,
// malformed, empty or dimension-inconsistent sections). Each variant carries relevant
// context (section names, file paths, underlying sources) for diagnostics. The module
// also provides VocabResult<T> as a convenience type alias for Result<T, VocabError>.
// Embedding computation itself has no error path; only vocabulary acquisition fails.

//! Error types for vocabulary loading and validation.
//!
//! Using thiserror for more idiomatic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vocabulary acquisition.
#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Vocabulary file path not specified")]
    PathNotConfigured,

    #[error("Unable to read vocabulary file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to parse vocabulary document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON root is not an object")]
    RootNotObject,

    #[error("Missing '{section}' section in vocabulary file")]
    MissingSection {
        section: &'static str,
    },

    #[error("Unable to parse '{section}' section from vocabulary")]
    MalformedSection {
        section: &'static str,
    },

    #[error("Empty '{section}' section in vocabulary file")]
    EmptySection {
        section: &'static str,
    },

    #[error("Dimension of '{section}' section of the vocabulary is zero")]
    ZeroDimension {
        section: &'static str,
    },

    #[error("All vectors in the '{section}' section of the vocabulary are not of the same dimension")]
    InconsistentDimension {
        section: &'static str,
    },

    #[error("Vocabulary sections have different dimensions")]
    SectionDimensionMismatch,

    #[error("Vocabulary is empty")]
    EmptyVocabulary,

    #[error("All vectors in the vocabulary are not of the same dimension")]
    MixedDimensions,
}

/// Result type alias for vocabulary operations.
pub type VocabResult<T> = Result<T, VocabError>;
