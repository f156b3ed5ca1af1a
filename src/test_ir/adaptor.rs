//! TestIr adaptor implementation for the embedding engine.
//!
//! This adaptor exposes a parsed [`TestIr`] module through the [`IrAdaptor`]
//! trait, enabling engine tests with small hand-written modules.

use super::{Operand, TestIr, TestType, TypeId};
use crate::core::IrAdaptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandRef(pub u32);

/// Adaptor that implements [`IrAdaptor`] for [`TestIr`].
pub struct TestIrAdaptor<'ir> {
    ir: &'ir TestIr,
}

impl<'ir> TestIrAdaptor<'ir> {
    pub fn new(ir: &'ir TestIr) -> Self {
        Self { ir }
    }

    /// Look up a function by name.
    pub fn function_named(&self, name: &str) -> Option<FuncRef> {
        self.ir
            .functions
            .iter()
            .position(|f| f.name == name)
            .map(|idx| FuncRef(idx as u32))
    }

    /// All blocks of a function in definition order.
    pub fn func_blocks(&self, func: FuncRef) -> impl Iterator<Item = BlockRef> + '_ {
        let func = &self.ir.functions[func.0 as usize];
        (func.block_begin_idx..func.block_end_idx).map(BlockRef)
    }

    /// Look up a block of a function by label.
    pub fn block_named(&self, func: FuncRef, name: &str) -> Option<BlockRef> {
        self.func_blocks(func)
            .find(|block| self.ir.blocks[block.0 as usize].name == name)
    }

    fn type_of(&self, ty: TypeId) -> &TestType {
        self.ir.type_of(ty)
    }
}

impl<'ir> IrAdaptor for TestIrAdaptor<'ir> {
    type FuncRef = FuncRef;
    type BlockRef = BlockRef;
    type InstRef = InstRef;
    type OperandRef = OperandRef;
    type TypeRef = TypeId;

    fn funcs(&self) -> Box<dyn Iterator<Item = FuncRef> + '_> {
        Box::new((0..self.ir.functions.len() as u32).map(FuncRef))
    }

    fn func_name(&self, func: FuncRef) -> &str {
        &self.ir.functions[func.0 as usize].name
    }

    fn entry_block(&self, func: FuncRef) -> Option<BlockRef> {
        let func = &self.ir.functions[func.0 as usize];
        if func.declaration || func.block_begin_idx == func.block_end_idx {
            return None;
        }
        Some(BlockRef(func.block_begin_idx))
    }

    fn block_succs(&self, block: BlockRef) -> Box<dyn Iterator<Item = BlockRef> + '_> {
        let info = &self.ir.blocks[block.0 as usize];
        Box::new(
            (info.succ_begin_idx..info.succ_end_idx)
                .map(move |idx| BlockRef(self.ir.succs[idx as usize])),
        )
    }

    fn block_insts(&self, block: BlockRef) -> Box<dyn Iterator<Item = InstRef> + '_> {
        // Debug pseudo instructions are hidden from the engine.
        let info = &self.ir.blocks[block.0 as usize];
        Box::new(
            (info.inst_begin_idx..info.inst_end_idx)
                .filter(move |&idx| !self.ir.values[idx as usize].is_debug())
                .map(InstRef),
        )
    }

    fn block_name(&self, block: BlockRef) -> &str {
        &self.ir.blocks[block.0 as usize].name
    }

    fn inst_opcode_name(&self, inst: InstRef) -> &str {
        &self.ir.values[inst.0 as usize].opcode
    }

    fn inst_result_type(&self, inst: InstRef) -> TypeId {
        self.ir.values[inst.0 as usize].ty
    }

    fn inst_operands(&self, inst: InstRef) -> Box<dyn Iterator<Item = OperandRef> + '_> {
        let value = &self.ir.values[inst.0 as usize];
        Box::new((value.op_begin_idx..value.op_end_idx).map(OperandRef))
    }

    fn inst_name(&self, inst: InstRef) -> &str {
        &self.ir.values[inst.0 as usize].name
    }

    fn type_is_void(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Void)
    }

    fn type_is_float(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Float(_))
    }

    fn type_is_integer(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Int(_))
    }

    fn type_is_pointer(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Ptr)
    }

    fn type_is_struct(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Struct(_))
    }

    fn type_is_array(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Array(..))
    }

    fn type_is_vector(&self, ty: TypeId) -> bool {
        matches!(self.type_of(ty), TestType::Vector(..))
    }

    fn operand_is_function(&self, operand: OperandRef) -> bool {
        matches!(self.ir.operands[operand.0 as usize], Operand::Func(_))
    }

    fn operand_is_pointer(&self, operand: OperandRef) -> bool {
        match self.ir.operands[operand.0 as usize] {
            Operand::Value(idx) => {
                matches!(self.type_of(self.ir.values[idx as usize].ty), TestType::Ptr)
            }
            _ => false,
        }
    }

    fn operand_is_constant(&self, operand: OperandRef) -> bool {
        matches!(self.ir.operands[operand.0 as usize], Operand::Const(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TestIr {
        TestIr::parse(text).unwrap()
    }

    #[test]
    fn test_adaptor_function_walk() {
        let ir = parse(
            "
main(%p: ptr, %n: i32) -> i32 {
entry:
    %v: i32 = load %p
    condbr %v, ^then, ^done
then:
    br ^done
done:
    ret %v
}
",
        );
        let adaptor = TestIrAdaptor::new(&ir);

        let funcs: Vec<_> = adaptor.funcs().collect();
        assert_eq!(funcs.len(), 1);
        assert_eq!(adaptor.func_name(funcs[0]), "main");

        let entry = adaptor.entry_block(funcs[0]).unwrap();
        assert_eq!(adaptor.block_name(entry), "entry");

        let succs: Vec<_> = adaptor
            .block_succs(entry)
            .map(|b| adaptor.block_name(b).to_string())
            .collect();
        assert_eq!(succs, vec!["then", "done"]);

        let insts: Vec<_> = adaptor.block_insts(entry).collect();
        assert_eq!(insts.len(), 2);
        assert_eq!(adaptor.inst_opcode_name(insts[0]), "load");
        assert_eq!(adaptor.inst_name(insts[0]), "v");
        assert!(adaptor.type_is_integer(adaptor.inst_result_type(insts[0])));
        assert!(adaptor.type_is_void(adaptor.inst_result_type(insts[1])));
    }

    #[test]
    fn test_adaptor_operand_kinds() {
        let ir = parse(
            "
f(%p: ptr, %n: i32) {
entry:
    store %p, %n
    call @ext, 3
    ret
}
ext(%x: i32) -> i32!
",
        );
        let adaptor = TestIrAdaptor::new(&ir);
        let func = adaptor.function_named("f").unwrap();
        let entry = adaptor.entry_block(func).unwrap();
        let insts: Vec<_> = adaptor.block_insts(entry).collect();

        let store_ops: Vec<_> = adaptor.inst_operands(insts[0]).collect();
        assert_eq!(store_ops.len(), 2);
        assert!(adaptor.operand_is_pointer(store_ops[0]));
        assert!(!adaptor.operand_is_pointer(store_ops[1]));
        assert!(!adaptor.operand_is_constant(store_ops[1]));

        let call_ops: Vec<_> = adaptor.inst_operands(insts[1]).collect();
        assert!(adaptor.operand_is_function(call_ops[0]));
        assert!(adaptor.operand_is_constant(call_ops[1]));
    }

    #[test]
    fn test_adaptor_hides_debug_instructions() {
        let ir = parse(
            "
f(%a: i32) {
entry:
    dbg %a
    %r: i32 = add %a, 1
    dbg.value %r
    ret
}
",
        );
        let adaptor = TestIrAdaptor::new(&ir);
        let func = adaptor.function_named("f").unwrap();
        let entry = adaptor.entry_block(func).unwrap();

        let opcodes: Vec<_> = adaptor
            .block_insts(entry)
            .map(|inst| adaptor.inst_opcode_name(inst).to_string())
            .collect();
        assert_eq!(opcodes, vec!["add", "ret"]);
    }

    #[test]
    fn test_adaptor_declaration_has_no_entry() {
        let ir = parse("ext(%x: i32) -> i32!");
        let adaptor = TestIrAdaptor::new(&ir);
        let func = adaptor.function_named("ext").unwrap();

        assert!(adaptor.entry_block(func).is_none());
        assert_eq!(adaptor.func_blocks(func).count(), 0);
    }

    #[test]
    fn test_adaptor_block_lookup() {
        let ir = parse(
            "
f() {
entry:
    br ^end
end:
    ret
}
",
        );
        let adaptor = TestIrAdaptor::new(&ir);
        let func = adaptor.function_named("f").unwrap();

        assert!(adaptor.block_named(func, "end").is_some());
        assert!(adaptor.block_named(func, "missing").is_none());
        assert_eq!(adaptor.func_blocks(func).count(), 2);
    }
}
