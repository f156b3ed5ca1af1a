// This module serves as the central hub for irvec's core infrastructure components,
// providing the building blocks shared between the vocabulary layer and the embedding
// engine. It exports and organizes the key subsystems: the Embedding vector type
// (element-wise arithmetic, scalar scaling, approximate comparison), the error
// taxonomy for vocabulary acquisition (thiserror-based VocabError/VocabResult), and
// the IrAdaptor trait that decouples the engine from any concrete IR implementation.
// Everything here is IR-agnostic; concrete IRs plug in through the adaptor trait.

//! Core irvec infrastructure.
//!
//! # Key Components
//!
//! ## Embedding Vectors (`embedding`)
//! - Fixed-dimension f64 vectors with element-wise arithmetic
//! - Fused scale-and-add for the weighting paths
//! - Approximate equality for comparing computed vectors
//!
//! ## Error Handling (`error`)
//! - `VocabError` covering configuration, I/O, JSON and schema failures
//! - `VocabResult<T>` alias used throughout the vocabulary layer
//!
//! ## IR Access (`adaptor`)
//! - `IrAdaptor` trait: read-only queries over functions, blocks,
//!   instructions, operands and types
//! - Category predicates that drive vocabulary key selection

pub mod adaptor;
pub mod embedding;
pub mod error;

// Re-export core components
pub use adaptor::IrAdaptor;
pub use embedding::Embedding;
pub use error::{VocabError, VocabResult};
