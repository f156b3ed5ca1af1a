// This module provides VocabProvider, the owner of the vocabulary for the lifetime of
// a compilation unit. The provider is constructed once (from a load, from an
// externally supplied table, or explicitly invalid) and handed by reference to
// whatever creates embedding engines. Its run constructor is the analysis entry
// point: a load failure there is reported through the log and swallowed into an
// invalid provider so the surrounding pipeline keeps running; callers must check
// is_valid before asking for the vocabulary. Accessing the vocabulary of an invalid
// provider is a caller contract violation and panics. Invalidation drops the owned
// table; replace installs a new one, which is how external invalidation events
// (changed configuration, new vocabulary file) are propagated.

//! Vocabulary ownership and invalidation.

use crate::core::VocabResult;

use super::loader::load_vocabulary;
use super::{VocabConfig, Vocabulary};

/// Owns the vocabulary for a compilation unit.
///
/// A provider is either valid (holds a vocabulary) or invalid. Engines borrow
/// the vocabulary from a valid provider; the borrow checker keeps the provider
/// alive for as long as any engine uses it.
#[derive(Debug, Default)]
pub struct VocabProvider {
    vocabulary: Option<Vocabulary>,
}

impl VocabProvider {
    /// Load the vocabulary named by `config`, propagating failures.
    pub fn load(config: &VocabConfig) -> VocabResult<Self> {
        Ok(Self {
            vocabulary: Some(load_vocabulary(config)?),
        })
    }

    /// Analysis entry point: load the vocabulary, degrading to an invalid
    /// provider on failure.
    ///
    /// The error is reported through the log rather than returned so callers
    /// that treat the vocabulary as optional keep running. Check
    /// [`VocabProvider::is_valid`] before use.
    pub fn run(config: &VocabConfig) -> Self {
        match load_vocabulary(config) {
            Ok(vocabulary) => Self {
                vocabulary: Some(vocabulary),
            },
            Err(err) => {
                log::error!("vocabulary load failed: {err}");
                Self::invalid()
            }
        }
    }

    /// Provider around an externally supplied vocabulary. No I/O happens.
    pub fn supplied(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary: Some(vocabulary),
        }
    }

    /// An explicitly invalid provider.
    pub fn invalid() -> Self {
        Self { vocabulary: None }
    }

    /// Whether a vocabulary is available.
    pub fn is_valid(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// The owned vocabulary.
    ///
    /// Panics if the provider is invalid; callers must check
    /// [`VocabProvider::is_valid`] first.
    pub fn vocabulary(&self) -> &Vocabulary {
        match &self.vocabulary {
            Some(vocabulary) => vocabulary,
            None => panic!("vocabulary requested from an invalid provider"),
        }
    }

    /// Dimension of the owned vocabulary.
    ///
    /// Panics if the provider is invalid.
    pub fn dimension(&self) -> usize {
        self.vocabulary().dimension()
    }

    /// Drop the owned vocabulary, making the provider invalid.
    pub fn invalidate(&mut self) {
        self.vocabulary = None;
    }

    /// Install a new vocabulary, making the provider valid again.
    pub fn replace(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = Some(vocabulary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Embedding;
    use std::collections::HashMap;

    fn small_vocab() -> Vocabulary {
        let mut entries = HashMap::new();
        entries.insert("add".to_string(), Embedding::from(vec![1.0, 2.0]));
        Vocabulary::from_entries(entries).unwrap()
    }

    #[test]
    fn test_run_degrades_to_invalid() {
        // Default config has no path, so the load fails.
        let provider = VocabProvider::run(&VocabConfig::default());
        assert!(!provider.is_valid());
    }

    #[test]
    fn test_load_propagates_error() {
        let result = VocabProvider::load(&VocabConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_supplied_is_valid() {
        let provider = VocabProvider::supplied(small_vocab());
        assert!(provider.is_valid());
        assert_eq!(provider.dimension(), 2);
        assert!(provider.vocabulary().contains("add"));
    }

    #[test]
    fn test_invalidate_and_replace() {
        let mut provider = VocabProvider::supplied(small_vocab());
        provider.invalidate();
        assert!(!provider.is_valid());

        provider.replace(small_vocab());
        assert!(provider.is_valid());
        assert_eq!(provider.dimension(), 2);
    }

    #[test]
    #[should_panic(expected = "invalid provider")]
    fn test_vocabulary_panics_when_invalid() {
        let provider = VocabProvider::invalid();
        let _ = provider.vocabulary();
    }
}
