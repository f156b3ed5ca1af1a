// This module loads and validates the vocabulary document. The document is a JSON
// object with three sections (Opcodes, Types, Arguments), each mapping entity names to
// numeric arrays. Every section is validated independently: it must be present, must
// be an object of name-to-number-array entries, must be non-empty, and all its arrays
// must share one non-zero dimension. The three section dimensions must agree with each
// other. After validation each section is scaled by its configured weight and the
// sections are merged in a fixed order (Opcodes, then Types, then Arguments) into one
// flat Vocabulary; on a key collision the later section wins. Each section body
// deserializes through a serde-derived entries table so malformed documents are
// rejected with the section that failed.

//! Vocabulary document loading.
//!
//! Validation runs before any entry becomes observable: a vocabulary either
//! loads completely or not at all.

use std::collections::HashMap;
use std::fs;

use serde::Deserialize;

use crate::core::{Embedding, VocabError, VocabResult};

use super::{VocabConfig, Vocabulary};

const SECTION_OPCODES: &str = "Opcodes";
const SECTION_TYPES: &str = "Types";
const SECTION_ARGUMENTS: &str = "Arguments";

/// Body of one vocabulary section: entity name to raw numeric vector.
///
/// The top-level document stays a [`serde_json::Value`] walk so an absent
/// section and a present-but-wrong-shape section report as different errors;
/// only the section body goes through typed deserialization.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct SectionEntries(HashMap<String, Vec<f64>>);

/// Read and parse the vocabulary document named by `config.path`.
///
/// Fails with [`VocabError::PathNotConfigured`] before touching the
/// filesystem when no path is set.
pub fn load_vocabulary(config: &VocabConfig) -> VocabResult<Vocabulary> {
    let path = config.path.as_ref().ok_or(VocabError::PathNotConfigured)?;
    let text = fs::read_to_string(path).map_err(|source| VocabError::Io {
        path: path.clone(),
        source,
    })?;
    parse_vocabulary(&text, config)
}

/// Parse, validate, weight and merge a vocabulary document.
pub fn parse_vocabulary(text: &str, config: &VocabConfig) -> VocabResult<Vocabulary> {
    let root: serde_json::Value = serde_json::from_str(text)?;
    let root = root.as_object().ok_or(VocabError::RootNotObject)?;

    let (opcodes, opcode_dim) = parse_section(root, SECTION_OPCODES)?;
    let (types, type_dim) = parse_section(root, SECTION_TYPES)?;
    let (args, arg_dim) = parse_section(root, SECTION_ARGUMENTS)?;

    if opcode_dim != type_dim || type_dim != arg_dim {
        return Err(VocabError::SectionDimensionMismatch);
    }

    // Merge order is part of the contract: a key that appears in a later
    // section overwrites the earlier entry.
    let weighted = [
        (opcodes, config.opcode_weight),
        (types, config.type_weight),
        (args, config.arg_weight),
    ];
    let mut entries = HashMap::new();
    for (section, weight) in weighted {
        for (key, values) in section {
            entries.insert(key, Embedding::from(values) * weight);
        }
    }

    let vocab = Vocabulary::from_entries(entries)?;
    log::debug!(
        "loaded vocabulary: {} entries of dimension {}",
        vocab.len(),
        vocab.dimension()
    );
    Ok(vocab)
}

/// Extract and validate one section, returning its entries and dimension.
fn parse_section(
    root: &serde_json::Map<String, serde_json::Value>,
    section: &'static str,
) -> VocabResult<(HashMap<String, Vec<f64>>, usize)> {
    let value = root
        .get(section)
        .ok_or(VocabError::MissingSection { section })?;

    let SectionEntries(table) = serde_json::from_value(value.clone())
        .map_err(|_| VocabError::MalformedSection { section })?;

    if table.is_empty() {
        return Err(VocabError::EmptySection { section });
    }

    let mut dim = None;
    for values in table.values() {
        match dim {
            None => dim = Some(values.len()),
            Some(d) if d != values.len() => {
                return Err(VocabError::InconsistentDimension { section });
            }
            Some(_) => {}
        }
    }
    let dim = dim.unwrap_or(0);
    if dim == 0 {
        return Err(VocabError::ZeroDimension { section });
    }

    Ok((table, dim))
}
