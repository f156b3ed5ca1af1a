// This module provides the Vocabulary lookup table and its configuration. A Vocabulary
// maps entity names (opcode names, type categories, operand categories) to Embedding
// vectors of one uniform dimension. It can only be constructed through validation:
// either the JSON loader in the loader submodule or from_entries for programmatically
// supplied tables, so a live Vocabulary is always non-empty with a consistent
// dimension. VocabConfig carries the file path and the three per-section scaling
// weights (opcodes 1.0, types 0.5, arguments 0.2 by default) as an explicit argument
// object instead of ambient global state. The provider submodule owns a loaded
// vocabulary for the lifetime of a compilation unit.

//! Vocabulary tables mapping IR entities to embeddings.
//!
//! The vocabulary is a single flat lookup table merged from the three sections
//! of the vocabulary document (opcodes, types, operand kinds). It is immutable
//! after construction and shared by reference with any number of embedding
//! engines.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::{Embedding, VocabError, VocabResult};

pub mod loader;
pub mod provider;

pub use loader::{load_vocabulary, parse_vocabulary};
pub use provider::VocabProvider;

/// Validated mapping from entity names to embedding vectors.
///
/// Invariants established at construction: at least one entry, and every entry
/// has the same dimension.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: HashMap<String, Embedding>,
    dimension: usize,
}

impl Vocabulary {
    /// Build a vocabulary from already-assembled entries.
    ///
    /// Fails if the table is empty or the entry dimensions are not uniform.
    /// This is the path for programmatically supplied vocabularies; file
    /// loading goes through [`load_vocabulary`].
    pub fn from_entries(entries: HashMap<String, Embedding>) -> VocabResult<Self> {
        let mut dims = entries.values().map(Embedding::len);
        let Some(dimension) = dims.next() else {
            return Err(VocabError::EmptyVocabulary);
        };
        if dims.any(|d| d != dimension) {
            return Err(VocabError::MixedDimensions);
        }
        Ok(Self { entries, dimension })
    }

    /// Look up the embedding for a key.
    pub fn get(&self, key: &str) -> Option<&Embedding> {
        self.entries.get(key)
    }

    /// Whether the vocabulary has an entry for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Dimension shared by every entry.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the vocabulary has no entries. Never true after validation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedding)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Configuration for vocabulary loading.
///
/// The weights scale each section of the vocabulary document at load time, so
/// lookups during embedding computation need no further scaling.
#[derive(Debug, Clone)]
pub struct VocabConfig {
    /// Path to the vocabulary JSON document.
    pub path: Option<PathBuf>,

    /// Scaling applied to the opcode section.
    pub opcode_weight: f64,

    /// Scaling applied to the type section.
    pub type_weight: f64,

    /// Scaling applied to the argument (operand kind) section.
    pub arg_weight: f64,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            path: None,
            opcode_weight: 1.0,
            type_weight: 0.5,
            arg_weight: 0.2,
        }
    }
}

impl VocabConfig {
    /// Default weights with the given vocabulary path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}
