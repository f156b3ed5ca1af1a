//! Test IR (TIR) parser and data structures for exercising the embedding
//! engine without a host compiler.
//!
//! This module provides a small typed SSA IR format. The format is designed
//! to be:
//! - Human-readable and writable
//! - Easy to parse
//! - Sufficient for driving every engine code path (types, operand kinds,
//!   control flow, declarations, debug pseudo instructions)
//!
//! # TIR Format
//!
//! ```text
//! ; Comments start with a semicolon
//! add_fn(%a: i32, %b: i32) -> i32 {
//! entry:
//!     %sum: i32 = add %a, %b
//!     ret %sum
//! }
//! ext_fn(%p: ptr) -> void!
//! ```
//!
//! Opcodes are free-form identifiers so tests can use any vocabulary key.
//! Operands are `%value` references, `@function` references or numeric
//! constants; `^label` arguments name successor blocks. A trailing `!`
//! instead of a body marks an external declaration. Opcodes named `dbg` or
//! starting with `dbg.` are debug pseudo instructions and are hidden from
//! the adaptor's instruction iteration.

pub mod adaptor;
pub mod parser;

pub use adaptor::TestIrAdaptor;

/// Interned type handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

/// Types the test IR can express.
#[derive(Debug, Clone, PartialEq)]
pub enum TestType {
    Void,
    /// Integer with a bit width, written `iN`.
    Int(u32),
    /// Float with a bit width, written `f32` or `f64`.
    Float(u32),
    Ptr,
    /// Fixed-size array, written `[N x T]`.
    Array(TypeId, u64),
    /// Aggregate, written `{T, T, ...}`.
    Struct(Vec<TypeId>),
    /// SIMD vector, written `<N x T>`.
    Vector(TypeId, u64),
}

/// Numeric constant operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Const {
    Int(i64),
    Float(f64),
}

/// One instruction operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// Index into [`TestIr::values`].
    Value(u32),
    Const(Const),
    /// Index into [`TestIr::functions`].
    Func(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Arg,
    Inst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Result name; empty for instructions without a result.
    pub name: String,
    pub kind: ValueKind,
    /// Free-form opcode; empty for arguments.
    pub opcode: String,
    /// Result type (void for instructions without a result).
    pub ty: TypeId,
    /// Operand indices into [`TestIr::operands`].
    pub op_begin_idx: u32,
    pub op_end_idx: u32,
}

impl Value {
    /// Debug pseudo instructions are hidden from the adaptor's iteration.
    pub fn is_debug(&self) -> bool {
        self.opcode == "dbg" || self.opcode.starts_with("dbg.")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    /// Instruction indices into [`TestIr::values`].
    pub inst_begin_idx: u32,
    pub inst_end_idx: u32,
    /// Successor indices into [`TestIr::succs`].
    pub succ_begin_idx: u32,
    pub succ_end_idx: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub declaration: bool,
    pub ret_type: TypeId,
    /// Argument indices into [`TestIr::values`].
    pub arg_begin_idx: u32,
    pub arg_end_idx: u32,
    /// Block indices into [`TestIr::blocks`].
    pub block_begin_idx: u32,
    pub block_end_idx: u32,
}

/// Flat storage for a parsed module.
#[derive(Debug, Clone, PartialEq)]
pub struct TestIr {
    pub functions: Vec<Function>,
    pub blocks: Vec<Block>,
    pub values: Vec<Value>,
    pub operands: Vec<Operand>,
    /// Successor block indices referenced by [`Block`] ranges.
    pub succs: Vec<u32>,
    /// Interned type table referenced by [`TypeId`].
    pub types: Vec<TestType>,
}

impl TestIr {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
            blocks: Vec::new(),
            values: Vec::new(),
            operands: Vec::new(),
            succs: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        parser::parse_ir(text)
    }

    /// Intern a type, reusing an existing id for an equal type.
    pub fn intern_type(&mut self, ty: TestType) -> TypeId {
        if let Some(pos) = self.types.iter().position(|t| *t == ty) {
            return TypeId(pos as u32);
        }
        self.types.push(ty);
        TypeId((self.types.len() - 1) as u32)
    }

    pub fn type_of(&self, id: TypeId) -> &TestType {
        &self.types[id.0 as usize]
    }
}

impl Default for TestIr {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_interning_reuses_ids() {
        let mut ir = TestIr::new();
        let a = ir.intern_type(TestType::Int(32));
        let b = ir.intern_type(TestType::Int(64));
        let c = ir.intern_type(TestType::Int(32));

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(ir.types.len(), 2);
    }

    #[test]
    fn test_debug_opcode_detection() {
        let value = |opcode: &str| Value {
            name: String::new(),
            kind: ValueKind::Inst,
            opcode: opcode.to_string(),
            ty: TypeId(0),
            op_begin_idx: 0,
            op_end_idx: 0,
        };

        assert!(value("dbg").is_debug());
        assert!(value("dbg.value").is_debug());
        assert!(!value("dbgx").is_debug());
        assert!(!value("add").is_debug());
    }
}
