//! IR Function - arena-backed graph of blocks, operations and values
//!
//! Blocks, operations and values live in arenas owned by the function and
//! are addressed by stable ids. Region orders and block op lists only hold
//! ids, so rewrites can split blocks, splice cloned blocks between existing
//! ones and erase operations without invalidating handles collected earlier.

use crate::op::{BinaryOp, BlockId, CompareOp, Op, OpId, OpKind, Terminator, Value};
use crate::types::Type;
use arbor_error::Loc;
use std::collections::HashMap;
use std::fmt;

/// An ordered sequence of blocks forming one control-flow scope.
/// The first block is the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub blocks: Vec<BlockId>,
}

impl Region {
    pub fn new(blocks: Vec<BlockId>) -> Self {
        Self { blocks }
    }

    /// Entry block of the region
    pub fn entry(&self) -> BlockId {
        *self.blocks.first().expect("region must have an entry block")
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Basic block: typed entry parameters, ordered operations, one terminator.
/// The terminator is `None` only transiently, while a rewrite is in flight.
#[derive(Debug, Clone)]
pub struct Block {
    pub params: Vec<Value>,
    pub ops: Vec<OpId>,
    pub term: Option<Terminator>,
}

#[derive(Debug, Clone)]
struct ValueInfo {
    ty: Type,
}

/// Old-to-new identity table threaded through region cloning.
///
/// Pre-populated entries are preserved, never overwritten; values with no
/// entry resolve to themselves, so operands defined outside the cloned
/// region are shared rather than duplicated.
#[derive(Debug, Default)]
pub struct CloneMap {
    values: HashMap<Value, Value>,
    blocks: HashMap<BlockId, BlockId>,
}

impl CloneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value mapping unless `from` is already mapped
    pub fn map_value(&mut self, from: Value, to: Value) {
        self.values.entry(from).or_insert(to);
    }

    /// Resolves a value through the table, falling back to identity
    pub fn value(&self, v: Value) -> Value {
        self.values.get(&v).copied().unwrap_or(v)
    }

    /// Records a block mapping unless `from` is already mapped
    pub fn map_block(&mut self, from: BlockId, to: BlockId) {
        self.blocks.entry(from).or_insert(to);
    }

    /// Looks up the clone of a block
    pub fn block(&self, b: BlockId) -> Option<BlockId> {
        self.blocks.get(&b).copied()
    }
}

/// Where a block sits: directly in the function body, or in the `idx`-th
/// region of an operation.
enum RegionSlot {
    Body,
    Op(OpId, usize),
}

/// Function: name, result types, body region and the arenas behind it
#[derive(Debug)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Result types of the function
    pub result_types: Vec<Type>,
    /// Top-level region; its entry block binds the function parameters
    pub body: Region,
    values: Vec<ValueInfo>,
    blocks: Vec<Block>,
    ops: Vec<Op>,
}

impl Function {
    /// Creates a function whose entry block binds one parameter per type in
    /// `params`
    pub fn new(name: impl Into<String>, params: Vec<Type>, result_types: Vec<Type>) -> Self {
        let mut func = Self {
            name: name.into(),
            result_types,
            body: Region::default(),
            values: Vec::new(),
            blocks: Vec::new(),
            ops: Vec::new(),
        };
        let entry = func.add_block(params);
        func.body.blocks.push(entry);
        func
    }

    /// Entry block of the function body
    pub fn entry(&self) -> BlockId {
        self.body.entry()
    }

    /// Creates a fresh SSA value of the given type
    pub fn new_value(&mut self, ty: Type) -> Value {
        let id = Value(self.values.len() as u32);
        self.values.push(ValueInfo { ty });
        id
    }

    /// Type of a value
    pub fn value_type(&self, v: Value) -> Type {
        self.values[v.0 as usize].ty
    }

    /// Creates a new block in the arena, detached from every region order
    pub fn add_block(&mut self, params: Vec<Type>) -> BlockId {
        let params = params.into_iter().map(|ty| self.new_value(ty)).collect();
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block { params, ops: Vec::new(), term: None });
        id
    }

    pub fn block(&self, b: BlockId) -> &Block {
        &self.blocks[b.0 as usize]
    }

    pub fn block_mut(&mut self, b: BlockId) -> &mut Block {
        &mut self.blocks[b.0 as usize]
    }

    pub fn op(&self, id: OpId) -> &Op {
        &self.ops[id.0 as usize]
    }

    pub fn op_mut(&mut self, id: OpId) -> &mut Op {
        &mut self.ops[id.0 as usize]
    }

    /// The `idx`-th result of an operation
    pub fn op_result(&self, id: OpId, idx: usize) -> Value {
        self.op(id).results[idx]
    }

    /// Appends a typed parameter to a block and returns its value
    pub fn add_block_param(&mut self, block: BlockId, ty: Type) -> Value {
        let v = self.new_value(ty);
        self.block_mut(block).params.push(v);
        v
    }

    /// Sets (or replaces) the terminator of a block
    pub fn set_terminator(&mut self, block: BlockId, term: Terminator) {
        self.block_mut(block).term = Some(term);
    }

    /// Creates an operation with fresh result values and appends it to the
    /// end of `block`'s operation list
    pub fn append_op(
        &mut self,
        block: BlockId,
        kind: OpKind,
        operands: Vec<Value>,
        result_types: Vec<Type>,
        regions: Vec<Region>,
        loc: Loc,
    ) -> OpId {
        let results = result_types.into_iter().map(|ty| self.new_value(ty)).collect();
        let id = OpId(self.ops.len() as u32);
        self.ops.push(Op { kind, operands, results, regions, loc });
        self.block_mut(block).ops.push(id);
        id
    }

    // ---- emit helpers ----

    pub fn const_int(&mut self, block: BlockId, value: i64, loc: Loc) -> Value {
        let op = self.append_op(block, OpKind::ConstInt(value), Vec::new(), vec![Type::Int], Vec::new(), loc);
        self.op_result(op, 0)
    }

    pub fn const_pred(&mut self, block: BlockId, value: bool, loc: Loc) -> Value {
        let op = self.append_op(block, OpKind::ConstPred(value), Vec::new(), vec![Type::Pred], Vec::new(), loc);
        self.op_result(op, 0)
    }

    pub fn binary(&mut self, block: BlockId, op: BinaryOp, lhs: Value, rhs: Value, loc: Loc) -> Value {
        let op = self.append_op(block, OpKind::Binary(op), vec![lhs, rhs], vec![Type::Int], Vec::new(), loc);
        self.op_result(op, 0)
    }

    pub fn compare(&mut self, block: BlockId, op: CompareOp, lhs: Value, rhs: Value, loc: Loc) -> Value {
        let op = self.append_op(block, OpKind::Compare(op), vec![lhs, rhs], vec![Type::Pred], Vec::new(), loc);
        self.op_result(op, 0)
    }

    /// Reduces a predicate to a primitive boolean
    pub fn extract(&mut self, block: BlockId, pred: Value, loc: Loc) -> Value {
        let op = self.append_op(block, OpKind::Extract, vec![pred], vec![Type::Bool], Vec::new(), loc);
        self.op_result(op, 0)
    }

    /// Emits a two-way structured conditional
    pub fn cond_op(
        &mut self,
        block: BlockId,
        pred: Value,
        true_arg: Value,
        false_arg: Value,
        on_true: Region,
        on_false: Region,
        result_type: Type,
        loc: Loc,
    ) -> Value {
        let op = self.append_op(
            block,
            OpKind::Cond,
            vec![pred, true_arg, false_arg],
            vec![result_type],
            vec![on_true, on_false],
            loc,
        );
        self.op_result(op, 0)
    }

    /// Emits a pre-tested structured loop; the result takes the type of the
    /// initial argument
    pub fn loop_op(
        &mut self,
        block: BlockId,
        init: Value,
        condition: Region,
        body: Region,
        loc: Loc,
    ) -> Value {
        let ty = self.value_type(init);
        let op = self.append_op(block, OpKind::Loop, vec![init], vec![ty], vec![condition, body], loc);
        self.op_result(op, 0)
    }

    // ---- traversal ----

    /// Visits every operation reachable from the function body, nested
    /// regions before the operation that owns them
    pub fn walk<F: FnMut(OpId)>(&self, f: &mut F) {
        self.walk_blocks(&self.body.blocks, f);
    }

    fn walk_blocks<F: FnMut(OpId)>(&self, blocks: &[BlockId], f: &mut F) {
        for &b in blocks {
            for &op in &self.block(b).ops {
                for region in &self.op(op).regions {
                    self.walk_blocks(&region.blocks, f);
                }
                f(op);
            }
        }
    }

    /// Every block reachable from the function body, in region order,
    /// nested regions after the block that reaches them
    pub fn live_blocks(&self) -> Vec<BlockId> {
        let mut out = Vec::new();
        self.collect_blocks(&self.body.blocks, &mut out);
        out
    }

    fn collect_blocks(&self, blocks: &[BlockId], out: &mut Vec<BlockId>) {
        for &b in blocks {
            out.push(b);
            for &op in &self.block(b).ops {
                for region in &self.op(op).regions {
                    self.collect_blocks(&region.blocks, out);
                }
            }
        }
    }

    /// The block an operation is currently placed in, if any
    pub fn parent_block(&self, op: OpId) -> Option<BlockId> {
        self.live_blocks().into_iter().find(|&b| self.block(b).ops.contains(&op))
    }

    fn locate_block(&self, anchor: BlockId) -> Option<(RegionSlot, usize)> {
        if let Some(i) = self.body.blocks.iter().position(|&b| b == anchor) {
            return Some((RegionSlot::Body, i));
        }
        let mut found = None;
        self.walk(&mut |op| {
            if found.is_some() {
                return;
            }
            for (ri, region) in self.op(op).regions.iter().enumerate() {
                if let Some(i) = region.blocks.iter().position(|&b| b == anchor) {
                    found = Some((RegionSlot::Op(op, ri), i));
                    return;
                }
            }
        });
        found
    }

    fn region_list_mut(&mut self, slot: RegionSlot) -> &mut Vec<BlockId> {
        match slot {
            RegionSlot::Body => &mut self.body.blocks,
            RegionSlot::Op(op, idx) => &mut self.ops[op.0 as usize].regions[idx].blocks,
        }
    }

    // ---- graph mutation ----

    /// Splices blocks into the region order containing `before`, directly
    /// in front of it
    pub fn insert_blocks_before(&mut self, before: BlockId, blocks: &[BlockId]) {
        let (slot, i) = self
            .locate_block(before)
            .expect("insertion anchor must be placed in a region");
        let list = self.region_list_mut(slot);
        list.splice(i..i, blocks.iter().copied());
    }

    fn insert_block_after(&mut self, after: BlockId, block: BlockId) {
        let (slot, i) = self
            .locate_block(after)
            .expect("insertion anchor must be placed in a region");
        self.region_list_mut(slot).insert(i + 1, block);
    }

    /// Splits `block` in two at `at`: `block` keeps the operations before
    /// `at`; a new block inserted right after it receives `at`, everything
    /// following it and the terminator. Value identities do not change.
    pub fn split_block(&mut self, block: BlockId, at: OpId) -> BlockId {
        let at_idx = self
            .block(block)
            .ops
            .iter()
            .position(|&o| o == at)
            .expect("split point must be an operation of the block being split");
        let tail = self.add_block(Vec::new());
        let moved = self.block_mut(block).ops.split_off(at_idx);
        let term = self.block_mut(block).term.take();
        let tail_block = self.block_mut(tail);
        tail_block.ops = moved;
        tail_block.term = term;
        self.insert_block_after(block, tail);
        tail
    }

    /// Deep-copies the blocks of `src` and splices the copies in front of
    /// `before`, in `src`'s declared order. Old-to-new identities are
    /// recorded in `map`; operands with no mapping are shared as-is.
    /// Returns the new block ids.
    pub fn clone_region_before(
        &mut self,
        src: &Region,
        before: BlockId,
        map: &mut CloneMap,
    ) -> Vec<BlockId> {
        let new_blocks = self.clone_blocks(&src.blocks, map);
        self.insert_blocks_before(before, &new_blocks);
        new_blocks
    }

    fn clone_blocks(&mut self, src: &[BlockId], map: &mut CloneMap) -> Vec<BlockId> {
        // First sweep: blocks and parameters, so branches and uses that
        // point forward inside the region resolve on the second sweep.
        let mut out = Vec::with_capacity(src.len());
        for &b in src {
            let old_params = self.block(b).params.clone();
            let param_types: Vec<Type> = old_params.iter().map(|&p| self.value_type(p)).collect();
            let nb = self.add_block(param_types);
            map.map_block(b, nb);
            let new_params = self.block(nb).params.clone();
            for (old, new) in old_params.into_iter().zip(new_params) {
                map.map_value(old, new);
            }
            out.push(nb);
        }
        // Second sweep: operations and terminators.
        for (i, &b) in src.iter().enumerate() {
            let nb = out[i];
            let op_ids = self.block(b).ops.clone();
            for id in op_ids {
                let cloned = self.clone_op(id, map);
                self.block_mut(nb).ops.push(cloned);
            }
            if let Some(term) = self.block(b).term.clone() {
                let remapped = self.remap_terminator(term, map);
                self.block_mut(nb).term = Some(remapped);
            }
        }
        out
    }

    fn clone_op(&mut self, id: OpId, map: &mut CloneMap) -> OpId {
        let src = self.op(id).clone();
        let operands: Vec<Value> = src.operands.iter().map(|&v| map.value(v)).collect();
        let mut regions = Vec::with_capacity(src.regions.len());
        for region in &src.regions {
            regions.push(Region::new(self.clone_blocks(&region.blocks, map)));
        }
        let mut results = Vec::with_capacity(src.results.len());
        for &old in &src.results {
            let ty = self.value_type(old);
            let new = self.new_value(ty);
            map.map_value(old, new);
            results.push(new);
        }
        let new_id = OpId(self.ops.len() as u32);
        self.ops.push(Op { kind: src.kind, operands, results, regions, loc: src.loc });
        new_id
    }

    fn remap_terminator(&self, term: Terminator, map: &CloneMap) -> Terminator {
        let values = |vs: Vec<Value>| -> Vec<Value> { vs.into_iter().map(|v| map.value(v)).collect() };
        let block = |b: BlockId| -> BlockId { map.block(b).unwrap_or(b) };
        match term {
            Terminator::Return { values: vs } => Terminator::Return { values: values(vs) },
            Terminator::Branch { dest, args } => Terminator::Branch { dest: block(dest), args: values(args) },
            Terminator::CondBranch { cond, true_dest, true_args, false_dest, false_args } => {
                Terminator::CondBranch {
                    cond: map.value(cond),
                    true_dest: block(true_dest),
                    true_args: values(true_args),
                    false_dest: block(false_dest),
                    false_args: values(false_args),
                }
            }
        }
    }

    /// Substitutes `from` for `to` in every operand and terminator value
    /// position reachable from the function body
    pub fn replace_all_uses(&mut self, from: Value, to: Value) {
        for b in self.live_blocks() {
            let op_ids = self.block(b).ops.clone();
            for id in op_ids {
                for v in self.op_mut(id).operands.iter_mut() {
                    if *v == from {
                        *v = to;
                    }
                }
            }
            if let Some(term) = self.block_mut(b).term.as_mut() {
                term.replace_value(from, to);
            }
        }
    }

    /// Removes an operation from the block it is placed in. The arena entry
    /// remains but becomes unreachable from every traversal.
    pub fn erase_op(&mut self, op: OpId) {
        let block = self
            .parent_block(op)
            .expect("cannot erase an operation that is not placed in a block");
        self.block_mut(block).ops.retain(|&o| o != op);
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define @{}(", self.name)?;
        for (i, &p) in self.block(self.entry()).params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", p, self.value_type(p))?;
        }
        write!(f, ")")?;
        if !self.result_types.is_empty() {
            write!(f, " -> ")?;
            for (i, ty) in self.result_types.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", ty)?;
            }
        }
        writeln!(f, " {{")?;
        self.fmt_blocks(f, &self.body.blocks, 0)?;
        writeln!(f, "}}")
    }
}

impl Function {
    fn fmt_blocks(&self, f: &mut fmt::Formatter<'_>, blocks: &[BlockId], indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        for &b in blocks {
            let block = self.block(b);
            write!(f, "{}{}(", pad, b)?;
            for (i, &p) in block.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", p, self.value_type(p))?;
            }
            writeln!(f, "):")?;
            for &op in &block.ops {
                self.fmt_op(f, op, indent + 1)?;
            }
            match &block.term {
                Some(term) => writeln!(f, "{}  {}", pad, term)?,
                None => writeln!(f, "{}  <unterminated>", pad)?,
            }
        }
        Ok(())
    }

    fn fmt_op(&self, f: &mut fmt::Formatter<'_>, op: OpId, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        let data = self.op(op);
        write!(f, "{}", pad)?;
        if let Some(&r) = data.results.first() {
            write!(f, "{} = ", r)?;
        }
        match &data.kind {
            OpKind::ConstInt(v) => writeln!(f, "const {}", v),
            OpKind::ConstPred(v) => writeln!(f, "pred {}", v),
            OpKind::Binary(b) => writeln!(f, "{} {}, {}", b, data.operands[0], data.operands[1]),
            OpKind::Compare(c) => writeln!(f, "cmp {} {}, {}", c, data.operands[0], data.operands[1]),
            OpKind::Extract => writeln!(f, "extract {}", data.operands[0]),
            OpKind::Cond => {
                writeln!(f, "cond {}, {}, {} {{", data.operands[0], data.operands[1], data.operands[2])?;
                self.fmt_blocks(f, &data.regions[0].blocks, indent + 1)?;
                writeln!(f, "{}}} {{", pad)?;
                self.fmt_blocks(f, &data.regions[1].blocks, indent + 1)?;
                writeln!(f, "{}}}", pad)
            }
            OpKind::Loop => {
                writeln!(f, "loop {} {{", data.operands[0])?;
                self.fmt_blocks(f, &data.regions[0].blocks, indent + 1)?;
                writeln!(f, "{}}} {{", pad)?;
                self.fmt_blocks(f, &data.regions[1].blocks, indent + 1)?;
                writeln!(f, "{}}}", pad)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_const_function() -> (Function, OpId, OpId, OpId) {
        let mut func = Function::new("f", Vec::new(), vec![Type::Int]);
        let entry = func.entry();
        let a = func.append_op(entry, OpKind::ConstInt(1), Vec::new(), vec![Type::Int], Vec::new(), Loc::Unknown);
        let b = func.append_op(entry, OpKind::ConstInt(2), Vec::new(), vec![Type::Int], Vec::new(), Loc::Unknown);
        let c = func.append_op(entry, OpKind::ConstInt(3), Vec::new(), vec![Type::Int], Vec::new(), Loc::Unknown);
        let r = func.op_result(c, 0);
        func.set_terminator(entry, Terminator::Return { values: vec![r] });
        (func, a, b, c)
    }

    #[test]
    fn test_split_block() {
        let (mut func, a, b, c) = three_const_function();
        let entry = func.entry();
        let c_result = func.op_result(c, 0);

        let tail = func.split_block(entry, b);

        assert_eq!(func.body.blocks, vec![entry, tail]);
        assert_eq!(func.block(entry).ops, vec![a]);
        assert_eq!(func.block(tail).ops, vec![b, c]);
        assert!(func.block(entry).term.is_none());
        assert_eq!(
            func.block(tail).term,
            Some(Terminator::Return { values: vec![c_result] })
        );
        // Identities survive the split.
        assert_eq!(func.op_result(c, 0), c_result);
    }

    #[test]
    #[should_panic(expected = "split point")]
    fn test_split_block_foreign_op() {
        let (mut func, _, b, _) = three_const_function();
        let entry = func.entry();
        let _ = func.split_block(entry, b);
        // b now lives in the tail block, not in entry.
        let _ = func.split_block(entry, b);
    }

    #[test]
    fn test_clone_region_shares_external_operands() {
        let mut func = Function::new("f", Vec::new(), vec![Type::Int]);
        let entry = func.entry();
        let outer = func.const_int(entry, 10, Loc::Unknown);

        let rb = func.add_block(vec![Type::Int]);
        let x = func.block(rb).params[0];
        let sum = func.binary(rb, BinaryOp::Add, x, outer, Loc::Unknown);
        func.set_terminator(rb, Terminator::Return { values: vec![sum] });

        let region = Region::new(vec![rb]);
        let mut map = CloneMap::new();
        let cloned = func.clone_region_before(&region, entry, &mut map);

        assert_eq!(cloned.len(), 1);
        let nb = cloned[0];
        assert_eq!(func.body.blocks, vec![nb, entry]);
        assert_eq!(map.block(rb), Some(nb));

        // Fresh parameter, mapped from the original.
        let nx = func.block(nb).params[0];
        assert_ne!(nx, x);
        assert_eq!(map.value(x), nx);

        // The add was structurally copied: region-local operand remapped,
        // external operand shared, result fresh and registered.
        let new_add = func.block(nb).ops[0];
        assert_eq!(func.op(new_add).operands, vec![nx, outer]);
        let new_sum = func.op_result(new_add, 0);
        assert_ne!(new_sum, sum);
        assert_eq!(map.value(sum), new_sum);
        assert_eq!(
            func.block(nb).term,
            Some(Terminator::Return { values: vec![new_sum] })
        );
    }

    #[test]
    fn test_clone_region_preserves_prepopulated_entries() {
        let mut func = Function::new("f", Vec::new(), Vec::new());
        let entry = func.entry();
        let replacement = func.const_int(entry, 99, Loc::Unknown);
        func.set_terminator(entry, Terminator::Return { values: Vec::new() });

        let rb = func.add_block(vec![Type::Int]);
        let x = func.block(rb).params[0];
        func.set_terminator(rb, Terminator::Return { values: vec![x] });

        let mut map = CloneMap::new();
        map.map_value(x, replacement);
        let cloned = func.clone_region_before(&Region::new(vec![rb]), entry, &mut map);

        // The pre-populated entry wins over the fresh parameter.
        assert_eq!(map.value(x), replacement);
        assert_eq!(
            func.block(cloned[0]).term,
            Some(Terminator::Return { values: vec![replacement] })
        );
    }

    #[test]
    fn test_replace_all_uses() {
        let mut func = Function::new("f", vec![Type::Int], vec![Type::Int]);
        let entry = func.entry();
        let x = func.block(entry).params[0];
        func.binary(entry, BinaryOp::Add, x, x, Loc::Unknown);
        func.set_terminator(entry, Terminator::Return { values: vec![x] });

        let fresh = func.new_value(Type::Int);
        func.replace_all_uses(x, fresh);

        let add = func.block(entry).ops[0];
        assert_eq!(func.op(add).operands, vec![fresh, fresh]);
        assert_eq!(
            func.block(entry).term,
            Some(Terminator::Return { values: vec![fresh] })
        );
        // Definitions are untouched, only uses move.
        assert_eq!(func.block(entry).params, vec![x]);
    }

    #[test]
    fn test_erase_op() {
        let (mut func, a, b, c) = three_const_function();
        let entry = func.entry();
        func.erase_op(b);
        assert_eq!(func.block(entry).ops, vec![a, c]);
        assert_eq!(func.parent_block(b), None);
    }

    #[test]
    fn test_walk_visits_nested_regions_first() {
        let mut func = Function::new("f", Vec::new(), vec![Type::Int]);
        let entry = func.entry();
        let p = func.const_pred(entry, true, Loc::Unknown);
        let a = func.const_int(entry, 1, Loc::Unknown);

        let tb = func.add_block(vec![Type::Int]);
        let tx = func.block(tb).params[0];
        func.set_terminator(tb, Terminator::Return { values: vec![tx] });
        let fb = func.add_block(vec![Type::Int]);
        let fx = func.block(fb).params[0];
        func.set_terminator(fb, Terminator::Return { values: vec![fx] });

        let r = func.cond_op(
            entry,
            p,
            a,
            a,
            Region::new(vec![tb]),
            Region::new(vec![fb]),
            Type::Int,
            Loc::Unknown,
        );
        func.set_terminator(entry, Terminator::Return { values: vec![r] });

        let mut kinds = Vec::new();
        func.walk(&mut |op| kinds.push(func.op(op).kind.clone()));
        // The conditional's (empty-op) regions contribute nothing, and the
        // structured op itself is visited after its regions.
        assert_eq!(
            kinds,
            vec![OpKind::ConstPred(true), OpKind::ConstInt(1), OpKind::Cond]
        );
    }

    #[test]
    fn test_function_display() {
        let mut func = Function::new("main", vec![Type::Int], vec![Type::Int]);
        let entry = func.entry();
        let x = func.block(entry).params[0];
        let one = func.const_int(entry, 1, Loc::Unknown);
        let sum = func.binary(entry, BinaryOp::Add, x, one, Loc::Unknown);
        func.set_terminator(entry, Terminator::Return { values: vec![sum] });

        let text = func.to_string();
        assert!(text.contains("define @main(%0: i64) -> i64 {"));
        assert!(text.contains("%1 = const 1"));
        assert!(text.contains("%2 = add %0, %1"));
        assert!(text.contains("ret %2"));
    }
}
