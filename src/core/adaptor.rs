// This module defines the IrAdaptor trait, which serves as the bridge between irvec and
// any SSA-based intermediate representation (IR). The trait provides a minimal read-only
// interface for the embedding engine to query IR structure: functions, blocks,
// instructions, operands and types. It defines associated types for the various IR
// references, methods to enumerate functions and walk the control flow graph from the
// entry block, and category predicates for types (void, float, integer, pointer and the
// rarer kinds) and operands (function, pointer, constant) that drive vocabulary key
// selection. This abstraction allows irvec to compute embeddings for different IRs
// without depending on their specific implementation details, and guarantees that the
// engine can never mutate the IR it reads.

//! IrAdaptor responsibilities.
//!
//! The adaptor is the glue between irvec and the host's SSA based IR. The engine
//! assumes:
//! - Each defined function has a single entry block; declarations have none.
//! - Basic blocks list their non-debug instructions in order.
//! - Control flow is reachable through per-block successor edges.
//!
//! The `IrAdaptor` trait covers the minimal set of queries the engine needs:
//! - Associated reference types for functions, blocks, instructions, operands
//!   and types.
//! - Queries for function enumeration and names.
//! - Methods to walk blocks, instructions and operands.
//! - Category predicates that classify types and operands for vocabulary
//!   lookup. The rarer type kinds default to `false` so simple IRs only
//!   implement what they have.
//!
//! All methods take `&self`; an adaptor is a read-only view of the IR.

use core::hash::Hash;

/// Bridge between an SSA IR and the embedding engine.
///
/// The [`IrAdaptor`] trait provides the hooks the engine needs to read an
/// arbitrary SSA IR. The adaptor is responsible for enumerating functions,
/// walking blocks and instructions, and classifying types and operands into
/// the categories the vocabulary knows about. Block and instruction references
/// must be hashable because the engine keys its caches on them.
pub trait IrAdaptor {
    type FuncRef: Copy + Eq;
    type BlockRef: Copy + Eq + Hash;
    type InstRef: Copy + Eq + Hash;
    type OperandRef: Copy;
    type TypeRef: Copy;

    /// Iterator over all functions in the module.
    fn funcs(&self) -> Box<dyn Iterator<Item = Self::FuncRef> + '_>;

    /// Name of the function.
    fn func_name(&self, func: Self::FuncRef) -> &str;

    /// Entry block of the function, or `None` for an external declaration.
    fn entry_block(&self, func: Self::FuncRef) -> Option<Self::BlockRef>;

    /// Successor blocks of a given block.
    fn block_succs(&self, block: Self::BlockRef) -> Box<dyn Iterator<Item = Self::BlockRef> + '_>;

    /// Iterator over the instructions of the given block, in order.
    ///
    /// Debug and other pseudo instructions must not be yielded; the engine
    /// embeds every instruction this iterator produces.
    fn block_insts(&self, block: Self::BlockRef) -> Box<dyn Iterator<Item = Self::InstRef> + '_>;

    /// Name of a block (for printing).
    fn block_name(&self, _block: Self::BlockRef) -> &str {
        ""
    }

    /// Opcode name of an instruction, as it appears in the vocabulary.
    fn inst_opcode_name(&self, inst: Self::InstRef) -> &str;

    /// Result type of an instruction.
    fn inst_result_type(&self, inst: Self::InstRef) -> Self::TypeRef;

    /// Iterator over the operands of an instruction, in declaration order.
    fn inst_operands(&self, inst: Self::InstRef) -> Box<dyn Iterator<Item = Self::OperandRef> + '_>;

    /// Result name of an instruction (for printing).
    fn inst_name(&self, _inst: Self::InstRef) -> &str {
        ""
    }

    /// Is this the void type?
    fn type_is_void(&self, ty: Self::TypeRef) -> bool;

    /// Is this a floating point type?
    fn type_is_float(&self, ty: Self::TypeRef) -> bool;

    /// Is this an integer type?
    fn type_is_integer(&self, ty: Self::TypeRef) -> bool;

    /// Is this a pointer type?
    fn type_is_pointer(&self, ty: Self::TypeRef) -> bool;

    /// Is this a function type?
    fn type_is_function(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this a struct type?
    fn type_is_struct(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this an array type?
    fn type_is_array(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this a vector type?
    fn type_is_vector(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this an empty aggregate type?
    fn type_is_empty(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this a label type?
    fn type_is_label(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this a token type?
    fn type_is_token(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Is this a metadata type?
    fn type_is_metadata(&self, _ty: Self::TypeRef) -> bool {
        false
    }

    /// Does this operand refer to a function?
    fn operand_is_function(&self, op: Self::OperandRef) -> bool;

    /// Does this operand have pointer type?
    fn operand_is_pointer(&self, op: Self::OperandRef) -> bool;

    /// Is this operand a constant?
    fn operand_is_constant(&self, op: Self::OperandRef) -> bool;
}
