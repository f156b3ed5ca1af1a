//! Parser for the TIR text format.
//!
//! The parser is a simple single-pass scanner over the input text. Value,
//! block and function operands may reference names that are defined later,
//! so references are recorded while scanning and patched once the enclosing
//! scope is complete: value and block references resolve at the end of each
//! function, function references at the end of the module.

use std::collections::HashMap;

use super::{Block, Const, Function, Operand, TestIr, TestType, TypeId, Value, ValueKind};

/// Parse a TIR module.
pub fn parse_ir(text: &str) -> Result<TestIr, String> {
    Parser::new(text).parse()
}

/// A forward reference waiting to be patched once its target is known.
#[derive(Debug)]
struct Resolve<'a> {
    name: &'a str,
    /// Slot to patch: an operand index for value and function references,
    /// a successor index for block references.
    index: u32,
}

struct Parser<'a> {
    text: &'a str,
    /// Byte offset into `text`.
    pos: usize,
    ir: TestIr,

    // Module scope
    funcs: HashMap<&'a str, u32>,
    func_resolves: Vec<Resolve<'a>>,

    // Function scope, cleared per function
    blocks: HashMap<&'a str, u32>,
    values: HashMap<&'a str, u32>,
    block_resolves: Vec<Resolve<'a>>,
    value_resolves: Vec<Resolve<'a>>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            ir: TestIr::new(),
            funcs: HashMap::new(),
            func_resolves: Vec::new(),
            blocks: HashMap::new(),
            values: HashMap::new(),
            block_resolves: Vec::new(),
            value_resolves: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<TestIr, String> {
        self.skip_whitespace(true);
        while !self.is_eof() {
            if let Err(err) = self.parse_function() {
                eprintln!("TIR parse error at offset {}: {}", self.pos, err);
                let start = self.pos.saturating_sub(20);
                let end = (self.pos + 20).min(self.text.len());
                if let Some(context) = self.text.get(start..end) {
                    eprintln!("context: {context:?}");
                }
                return Err(err);
            }
            self.skip_whitespace(true);
        }
        self.resolve_module_references()?;
        Ok(self.ir)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    /// Skip whitespace and `;` comments. With `skip_newlines` false the
    /// scanner stops at the end of the current line, which delimits
    /// instruction operand lists.
    fn skip_whitespace(&mut self, skip_newlines: bool) {
        while let Some(ch) = self.current_char() {
            if ch == ';' {
                if !skip_newlines {
                    break;
                }
                while let Some(ch) = self.current_char() {
                    self.advance();
                    if ch == '\n' {
                        break;
                    }
                }
            } else if ch.is_whitespace() {
                if ch == '\n' && !skip_newlines {
                    break;
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    /// True when only spaces remain before the end of the current line. A
    /// comment terminates the line as well.
    fn at_line_end(&self) -> bool {
        for ch in self.text[self.pos..].chars() {
            match ch {
                ' ' | '\t' | '\r' => continue,
                '\n' | ';' => return true,
                _ => return false,
            }
        }
        true
    }

    fn try_read(&mut self, expected: char) -> bool {
        self.skip_whitespace(true);
        if self.current_char() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    /// Like [`Self::try_read`] but never crosses a line boundary.
    fn try_read_inline(&mut self, expected: char) -> bool {
        self.skip_whitespace(false);
        if self.current_char() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        if !self.try_read(expected) {
            return Err(format!(
                "expected '{}' but found {:?}",
                expected,
                self.current_char()
            ));
        }
        Ok(())
    }

    fn read_identifier(&mut self) -> Result<&'a str, String> {
        self.skip_whitespace(true);
        let start = self.pos;
        match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.advance(),
            other => return Err(format!("expected identifier but found {other:?}")),
        }
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(&self.text[start..self.pos])
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), String> {
        let ident = self.read_identifier()?;
        if ident != keyword {
            return Err(format!("expected '{keyword}' but found '{ident}'"));
        }
        Ok(())
    }

    fn read_u64(&mut self) -> Result<u64, String> {
        self.skip_whitespace(true);
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(format!(
                "expected number but found {:?}",
                self.current_char()
            ));
        }
        self.text[start..self.pos]
            .parse()
            .map_err(|err| format!("invalid number: {err}"))
    }

    /// `void`, `ptr`, `iN`, `f32`, `f64`, `[N x T]`, `{T, ...}` or `<N x T>`.
    fn read_type(&mut self) -> Result<TypeId, String> {
        self.skip_whitespace(true);
        match self.current_char() {
            Some('[') => {
                self.advance();
                let count = self.read_u64()?;
                self.expect_keyword("x")?;
                let elem = self.read_type()?;
                self.expect(']')?;
                Ok(self.ir.intern_type(TestType::Array(elem, count)))
            }
            Some('<') => {
                self.advance();
                let count = self.read_u64()?;
                self.expect_keyword("x")?;
                let elem = self.read_type()?;
                self.expect('>')?;
                Ok(self.ir.intern_type(TestType::Vector(elem, count)))
            }
            Some('{') => {
                self.advance();
                let mut fields = Vec::new();
                loop {
                    fields.push(self.read_type()?);
                    if !self.try_read(',') {
                        break;
                    }
                }
                self.expect('}')?;
                Ok(self.ir.intern_type(TestType::Struct(fields)))
            }
            _ => {
                let name = self.read_identifier()?;
                let ty = match name {
                    "void" => TestType::Void,
                    "ptr" => TestType::Ptr,
                    "f32" => TestType::Float(32),
                    "f64" => TestType::Float(64),
                    _ if name.starts_with('i') && name.len() > 1 => {
                        let width = name[1..]
                            .parse()
                            .map_err(|_| format!("unknown type '{name}'"))?;
                        TestType::Int(width)
                    }
                    _ => return Err(format!("unknown type '{name}'")),
                };
                Ok(self.ir.intern_type(ty))
            }
        }
    }

    /// Integer or decimal float literal, optionally negative.
    fn read_const(&mut self) -> Result<Const, String> {
        let start = self.pos;
        if self.current_char() == Some('-') {
            self.advance();
        }
        let digits_start = self.pos;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == digits_start {
            return Err(format!(
                "expected constant but found {:?}",
                self.current_char()
            ));
        }
        let mut is_float = false;
        if self.current_char() == Some('.') {
            is_float = true;
            self.advance();
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let literal = &self.text[start..self.pos];
        if is_float {
            literal
                .parse()
                .map(Const::Float)
                .map_err(|err| format!("invalid float constant '{literal}': {err}"))
        } else {
            literal
                .parse()
                .map(Const::Int)
                .map_err(|err| format!("invalid integer constant '{literal}': {err}"))
        }
    }

    fn parse_function(&mut self) -> Result<(), String> {
        let func_name = self.read_identifier()?;
        if self.funcs.contains_key(func_name) {
            return Err(format!("duplicate function definition: '{func_name}'"));
        }
        let func_idx = self.ir.functions.len() as u32;

        self.blocks.clear();
        self.values.clear();
        self.block_resolves.clear();
        self.value_resolves.clear();

        self.expect('(')?;
        let arg_begin_idx = self.ir.values.len() as u32;
        while !self.try_read(')') {
            self.expect('%')?;
            let arg_name = self.read_identifier()?;
            self.expect(':')?;
            let ty = self.read_type()?;

            if self.values.contains_key(arg_name) {
                return Err(format!("duplicate value definition: '%{arg_name}'"));
            }
            self.values.insert(arg_name, self.ir.values.len() as u32);
            self.ir.values.push(Value {
                name: arg_name.to_string(),
                kind: ValueKind::Arg,
                opcode: String::new(),
                ty,
                op_begin_idx: 0,
                op_end_idx: 0,
            });

            if !self.try_read(',') {
                self.skip_whitespace(true);
                if self.current_char() != Some(')') {
                    return Err("expected ',' or ')' in argument list".to_string());
                }
            }
        }
        let arg_end_idx = self.ir.values.len() as u32;

        let ret_type = if self.try_read('-') {
            self.expect('>')?;
            self.read_type()?
        } else {
            self.ir.intern_type(TestType::Void)
        };

        let block_begin_idx = self.ir.blocks.len() as u32;
        if self.try_read('!') {
            // External declaration without a body.
            self.funcs.insert(func_name, func_idx);
            self.ir.functions.push(Function {
                name: func_name.to_string(),
                declaration: true,
                ret_type,
                arg_begin_idx,
                arg_end_idx,
                block_begin_idx,
                block_end_idx: block_begin_idx,
            });
            return Ok(());
        }

        self.expect('{')?;
        while !self.try_read('}') {
            self.parse_block()?;
        }
        let block_end_idx = self.ir.blocks.len() as u32;

        self.resolve_function_references()?;

        self.funcs.insert(func_name, func_idx);
        self.ir.functions.push(Function {
            name: func_name.to_string(),
            declaration: false,
            ret_type,
            arg_begin_idx,
            arg_end_idx,
            block_begin_idx,
            block_end_idx,
        });
        Ok(())
    }

    fn parse_block(&mut self) -> Result<(), String> {
        let block_name = self.read_identifier()?;
        self.expect(':')?;

        if self.blocks.contains_key(block_name) {
            return Err(format!("duplicate block label: '{block_name}'"));
        }
        let block_idx = self.ir.blocks.len() as u32;
        self.blocks.insert(block_name, block_idx);

        let inst_begin_idx = self.ir.values.len() as u32;
        let mut successor_refs: Vec<&'a str> = Vec::new();
        while !self.at_block_end() {
            self.parse_inst(&mut successor_refs)?;
        }
        let inst_end_idx = self.ir.values.len() as u32;

        let succ_begin_idx = self.ir.succs.len() as u32;
        for succ_name in successor_refs {
            self.block_resolves.push(Resolve {
                name: succ_name,
                index: self.ir.succs.len() as u32,
            });
            // Placeholder patched by resolve_function_references.
            self.ir.succs.push(0);
        }
        let succ_end_idx = self.ir.succs.len() as u32;

        self.ir.blocks.push(Block {
            name: block_name.to_string(),
            inst_begin_idx,
            inst_end_idx,
            succ_begin_idx,
            succ_end_idx,
        });
        Ok(())
    }

    /// True before a closing `}` or the label of the next block. Labels are
    /// distinguished from opcode-only instructions by the trailing `:`.
    fn at_block_end(&mut self) -> bool {
        self.skip_whitespace(true);
        match self.current_char() {
            None | Some('}') => true,
            Some('%') => false,
            _ => {
                let saved = self.pos;
                let is_label = match self.read_identifier() {
                    Ok(_) => {
                        self.skip_whitespace(false);
                        self.current_char() == Some(':')
                    }
                    Err(_) => false,
                };
                self.pos = saved;
                is_label
            }
        }
    }

    fn parse_inst(&mut self, successors: &mut Vec<&'a str>) -> Result<(), String> {
        self.skip_whitespace(true);

        // Optional result: "%name: type ="
        let (name, ty) = if self.current_char() == Some('%') {
            self.advance();
            let name = self.read_identifier()?;
            self.expect(':')?;
            let ty = self.read_type()?;
            self.expect('=')?;
            (Some(name), ty)
        } else {
            (None, self.ir.intern_type(TestType::Void))
        };

        self.skip_whitespace(true);
        let opcode = self.read_identifier()?;

        let value_idx = self.ir.values.len() as u32;
        if let Some(name) = name {
            if self.values.contains_key(name) {
                return Err(format!("duplicate value definition: '%{name}'"));
            }
            self.values.insert(name, value_idx);
        }

        let op_begin_idx = self.ir.operands.len() as u32;
        loop {
            if self.at_line_end() {
                break;
            }
            self.skip_whitespace(false);
            match self.current_char() {
                Some('%') => {
                    self.advance();
                    let operand_name = self.read_identifier()?;
                    self.value_resolves.push(Resolve {
                        name: operand_name,
                        index: self.ir.operands.len() as u32,
                    });
                    // Placeholder patched by resolve_function_references.
                    self.ir.operands.push(Operand::Value(0));
                }
                Some('@') => {
                    self.advance();
                    let callee_name = self.read_identifier()?;
                    self.func_resolves.push(Resolve {
                        name: callee_name,
                        index: self.ir.operands.len() as u32,
                    });
                    // Placeholder patched by resolve_module_references.
                    self.ir.operands.push(Operand::Func(0));
                }
                Some('^') => {
                    self.advance();
                    let succ_name = self.read_identifier()?;
                    successors.push(succ_name);
                }
                Some(ch) if ch == '-' || ch.is_ascii_digit() => {
                    let constant = self.read_const()?;
                    self.ir.operands.push(Operand::Const(constant));
                }
                other => {
                    return Err(format!("expected operand but found {other:?}"));
                }
            }
            if !self.try_read_inline(',') {
                break;
            }
            if self.at_line_end() {
                return Err("expected operand after ','".to_string());
            }
        }
        let op_end_idx = self.ir.operands.len() as u32;

        self.ir.values.push(Value {
            name: name.map(|n| n.to_string()).unwrap_or_default(),
            kind: ValueKind::Inst,
            opcode: opcode.to_string(),
            ty,
            op_begin_idx,
            op_end_idx,
        });
        Ok(())
    }

    fn resolve_function_references(&mut self) -> Result<(), String> {
        for resolve in &self.value_resolves {
            match self.values.get(resolve.name) {
                Some(&idx) => self.ir.operands[resolve.index as usize] = Operand::Value(idx),
                None => return Err(format!("undefined value reference: %{}", resolve.name)),
            }
        }
        for resolve in &self.block_resolves {
            match self.blocks.get(resolve.name) {
                Some(&idx) => self.ir.succs[resolve.index as usize] = idx,
                None => return Err(format!("undefined block reference: ^{}", resolve.name)),
            }
        }
        Ok(())
    }

    fn resolve_module_references(&mut self) -> Result<(), String> {
        for resolve in &self.func_resolves {
            match self.funcs.get(resolve.name) {
                Some(&idx) => self.ir.operands[resolve.index as usize] = Operand::Func(idx),
                None => return Err(format!("undefined function reference: @{}", resolve.name)),
            }
        }
        Ok(())
    }
}
