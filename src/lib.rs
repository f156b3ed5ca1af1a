//! irvec - Flow-aware vector embeddings for SSA-based IRs.
//!
//! irvec turns programs into fixed-dimension `f64` vectors suitable for
//! machine-learning models that consume code. Every instruction is embedded
//! as a weighted sum of seed vectors for its opcode, its result type
//! category and the category of each operand; block vectors sum their
//! instructions and function vectors sum the blocks reachable from the
//! entry.
//!
//! # Primary Usage
//!
//! ```ignore
//! use irvec::{Embedder, EmbedderKind, VocabConfig, load_vocabulary};
//! use irvec::test_ir::{TestIr, TestIrAdaptor};
//!
//! let vocab = load_vocabulary(&VocabConfig::with_path("vocab.json"))?;
//!
//! let ir = TestIr::parse(text)?;
//! let adaptor = TestIrAdaptor::new(&ir);
//! for func in adaptor.funcs() {
//!     let embedder = Embedder::create(EmbedderKind::Symbolic, &adaptor, func, &vocab);
//!     println!("{}", embedder.unwrap().function_vector());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Embedding arithmetic, the [`IrAdaptor`] trait and errors
//! - [`vocab`] - Seed vocabulary loading, validation and ownership
//! - [`embedder`] - The embedding engine with per-function caches
//! - [`test_ir`] - Text-format test IR for exercising the engine

pub mod core;
pub mod embedder;
pub mod test_ir;
pub mod vocab;

pub use core::{Embedding, IrAdaptor, VocabError, VocabResult};
pub use embedder::{Embedder, EmbedderKind};
pub use vocab::{
    load_vocabulary, parse_vocabulary, VocabConfig, VocabProvider, Vocabulary,
};
