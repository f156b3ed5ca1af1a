// This module implements the embedding engine that turns IR entities into vectors. An
// Embedder is bound to one function of one IR (through the IrAdaptor trait) and one
// vocabulary. Instruction vectors are the sum of the opcode entry, the result type
// category entry and one operand category entry per operand; block vectors sum their
// instructions; the function vector sums the blocks reachable from the entry block,
// discovered with an explicit-stack depth-first walk. Instruction and block vectors
// are cached in RefCell-backed maps filled by one whole-function pass; the function
// vector is deliberately never cached and is recomputed from a fresh zero accumulator
// on every request so repeated requests always agree. Vocabulary lookups never fail:
// a missing key yields the zero vector, a debug log line and a per-engine miss count.

//! Embedding computation over an SSA IR.
//!
//! The engine is selected through [`EmbedderKind`]; the symbolic strategy is
//! the only one implemented today. Construction fails (returns `None`) for an
//! unsupported kind rather than panicking.
//!
//! Caching contract: the per-instruction and per-block maps are filled as a
//! whole by the first computation, triggered by any map request or any single
//! block request while the caches are cold. Blocks that are unreachable from
//! the entry block are never computed and never appear in the maps. The
//! function vector is recomputed on every request.

use std::cell::{Cell, Ref, RefCell};
use std::collections::{HashMap, HashSet};

use crate::core::{Embedding, IrAdaptor};
use crate::vocab::Vocabulary;

/// Embedding strategy selector.
///
/// Strategies are a closed set; adding one means adding a variant and its
/// computation arm, not a new implementation hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// Look up opcode, type category and operand categories in the vocabulary.
    Symbolic,
}

/// Per-function embedding engine.
///
/// Holds the instruction and block caches for one function. Not `Sync`: the
/// caches use interior mutability so all vector getters take `&self`. Create
/// one engine per function; dropping it discards the cached vectors.
pub struct Embedder<'a, A: IrAdaptor> {
    kind: EmbedderKind,
    ir: &'a A,
    func: A::FuncRef,
    vocab: &'a Vocabulary,
    dim: usize,
    inst_map: RefCell<HashMap<A::InstRef, Embedding>>,
    block_map: RefCell<HashMap<A::BlockRef, Embedding>>,
    vocab_misses: Cell<u64>,
}

impl<'a, A: IrAdaptor> Embedder<'a, A> {
    /// Create an engine of the given kind for one function.
    ///
    /// Returns `None` for an unsupported kind.
    pub fn create(
        kind: EmbedderKind,
        ir: &'a A,
        func: A::FuncRef,
        vocab: &'a Vocabulary,
    ) -> Option<Self> {
        match kind {
            EmbedderKind::Symbolic => Some(Self {
                kind,
                ir,
                func,
                vocab,
                dim: vocab.dimension(),
                inst_map: RefCell::new(HashMap::new()),
                block_map: RefCell::new(HashMap::new()),
                vocab_misses: Cell::new(0),
            }),
        }
    }

    /// Dimension of every vector this engine produces.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Number of vocabulary lookups that found no entry so far.
    pub fn vocab_misses(&self) -> u64 {
        self.vocab_misses.get()
    }

    /// Look up a key in the vocabulary.
    ///
    /// A missing key is not an error: the result is the zero vector and the
    /// miss counter is bumped so callers can audit vocabulary coverage.
    pub fn lookup_vocab(&self, key: &str) -> Embedding {
        if let Some(entry) = self.vocab.get(key) {
            return entry.clone();
        }
        self.vocab_misses.set(self.vocab_misses.get() + 1);
        log::debug!("vocabulary has no entry for '{key}', using a zero vector");
        Embedding::zeros(self.dim)
    }

    /// The function vector, recomputed on every request.
    ///
    /// Declarations produce the zero vector. The computation fills the
    /// instruction and block caches as a side effect, so later per-block and
    /// per-instruction requests are lookups.
    pub fn function_vector(&self) -> Embedding {
        self.compute_function()
    }

    /// The vector of one block, or `None` for a block outside the computed
    /// set (in particular a block unreachable from the entry block).
    ///
    /// A request while the caches are cold triggers the whole-function
    /// computation; a single block is never computed in isolation.
    pub fn block_vector(&self, block: A::BlockRef) -> Option<Ref<'_, Embedding>> {
        self.ensure_computed();
        Ref::filter_map(self.block_map.borrow(), |map| map.get(&block)).ok()
    }

    /// Read-only view of the per-instruction vectors, computing them first if
    /// necessary. Covers exactly the instructions of reachable blocks.
    pub fn inst_vec_map(&self) -> Ref<'_, HashMap<A::InstRef, Embedding>> {
        self.ensure_computed();
        self.inst_map.borrow()
    }

    /// Read-only view of the per-block vectors, computing them first if
    /// necessary. Covers exactly the blocks reachable from the entry block.
    pub fn block_vec_map(&self) -> Ref<'_, HashMap<A::BlockRef, Embedding>> {
        self.ensure_computed();
        self.block_map.borrow()
    }

    fn ensure_computed(&self) {
        if self.block_map.borrow().is_empty() {
            self.compute_function();
        }
    }

    /// Walk the blocks reachable from the entry block and sum their vectors
    /// into a fresh accumulator. Blocks missing from the cache are computed
    /// and inserted on the way.
    fn compute_function(&self) -> Embedding {
        let mut acc = Embedding::zeros(self.dim);
        let Some(entry) = self.ir.entry_block(self.func) else {
            // External declaration: zero vector, nothing to cache.
            return acc;
        };
        log::trace!(
            "computing embeddings for function '{}'",
            self.ir.func_name(self.func)
        );

        let mut stack = vec![entry];
        let mut visited = HashSet::new();
        while let Some(block) = stack.pop() {
            if !visited.insert(block) {
                continue;
            }
            self.ensure_block(block);
            if let Some(vec) = self.block_map.borrow().get(&block) {
                acc += vec;
            }
            for succ in self.ir.block_succs(block) {
                stack.push(succ);
            }
        }
        acc
    }

    fn ensure_block(&self, block: A::BlockRef) {
        if self.block_map.borrow().contains_key(&block) {
            return;
        }
        let vec = self.compute_block(block);
        self.block_map.borrow_mut().insert(block, vec);
    }

    fn compute_block(&self, block: A::BlockRef) -> Embedding {
        let mut acc = Embedding::zeros(self.dim);
        for inst in self.ir.block_insts(block) {
            let vec = self.compute_inst(inst);
            acc += &vec;
            self.inst_map.borrow_mut().insert(inst, vec);
        }
        acc
    }

    fn compute_inst(&self, inst: A::InstRef) -> Embedding {
        match self.kind {
            EmbedderKind::Symbolic => self.symbolic_inst(inst),
        }
    }

    /// Symbolic instruction embedding: opcode entry plus result type category
    /// plus one operand category entry per operand, in operand order.
    fn symbolic_inst(&self, inst: A::InstRef) -> Embedding {
        let mut vec = self.lookup_vocab(self.ir.inst_opcode_name(inst));
        vec += self.type_embedding(self.ir.inst_result_type(inst));
        for op in self.ir.inst_operands(inst) {
            vec += self.operand_embedding(op);
        }
        vec
    }

    /// Classify a type into its vocabulary key. The first matching category
    /// wins; the order of the checks is part of the contract. Later
    /// predicates are not queried once a category matched.
    fn type_embedding(&self, ty: A::TypeRef) -> Embedding {
        let ir = self.ir;
        if ir.type_is_void(ty) {
            return self.lookup_vocab("voidTy");
        }
        if ir.type_is_float(ty) {
            return self.lookup_vocab("floatTy");
        }
        if ir.type_is_integer(ty) {
            return self.lookup_vocab("integerTy");
        }
        if ir.type_is_function(ty) {
            return self.lookup_vocab("functionTy");
        }
        if ir.type_is_struct(ty) {
            return self.lookup_vocab("structTy");
        }
        if ir.type_is_array(ty) {
            return self.lookup_vocab("arrayTy");
        }
        if ir.type_is_pointer(ty) {
            return self.lookup_vocab("pointerTy");
        }
        if ir.type_is_vector(ty) {
            return self.lookup_vocab("vectorTy");
        }
        if ir.type_is_empty(ty) {
            return self.lookup_vocab("emptyTy");
        }
        if ir.type_is_label(ty) {
            return self.lookup_vocab("labelTy");
        }
        if ir.type_is_token(ty) {
            return self.lookup_vocab("tokenTy");
        }
        if ir.type_is_metadata(ty) {
            return self.lookup_vocab("metadataTy");
        }
        self.lookup_vocab("unknownTy")
    }

    /// Classify an operand into its vocabulary key: function before pointer
    /// before constant, with variable as the fallback.
    fn operand_embedding(&self, op: A::OperandRef) -> Embedding {
        let key = if self.ir.operand_is_function(op) {
            "function"
        } else if self.ir.operand_is_pointer(op) {
            "pointer"
        } else if self.ir.operand_is_constant(op) {
            "constant"
        } else {
            "variable"
        };
        self.lookup_vocab(key)
    }
}
