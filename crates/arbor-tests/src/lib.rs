//! Integration tests for the arbor compiler
//!
//! This crate provides end-to-end testing of structured control flow
//! lowering: build an IR function, run legalize-control-flow, then execute
//! the resulting branch graph with a small reference evaluator and check
//! values and block visit counts.

use std::collections::HashMap;

use arbor_error::Loc;
use arbor_ir::{
    BinaryOp, BlockId, CompareOp, Function, OpKind, Region, Terminator, Type, Value,
};

/// Runtime value produced by the reference evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunValue {
    Int(i64),
    Bool(bool),
    Pred(bool),
}

impl RunValue {
    pub fn as_int(self) -> i64 {
        match self {
            RunValue::Int(v) => v,
            other => panic!("expected an integer, found {:?}", other),
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            RunValue::Bool(v) => v,
            other => panic!("expected a boolean, found {:?}", other),
        }
    }

    pub fn as_pred(self) -> bool {
        match self {
            RunValue::Pred(v) => v,
            other => panic!("expected a predicate, found {:?}", other),
        }
    }
}

/// Result of executing a function: returned values plus per-block visit
/// counts
#[derive(Debug)]
pub struct Trace {
    pub results: Vec<RunValue>,
    visits: HashMap<BlockId, u32>,
}

impl Trace {
    /// How many times a block was entered
    pub fn visits(&self, block: BlockId) -> u32 {
        self.visits.get(&block).copied().unwrap_or(0)
    }
}

/// Executes a fully legalized function. Panics if a structured operation is
/// still present; run legalize-control-flow first.
pub fn execute(func: &Function, args: &[RunValue]) -> Trace {
    let mut env: HashMap<Value, RunValue> = HashMap::new();
    let mut visits: HashMap<BlockId, u32> = HashMap::new();
    let mut current = func.entry();
    let mut incoming: Vec<RunValue> = args.to_vec();

    loop {
        *visits.entry(current).or_insert(0) += 1;
        let block = func.block(current);
        assert_eq!(
            block.params.len(),
            incoming.len(),
            "block argument arity mismatch entering {}",
            current
        );
        for (&param, &value) in block.params.iter().zip(incoming.iter()) {
            env.insert(param, value);
        }

        for &id in &block.ops {
            let op = func.op(id);
            let value = match &op.kind {
                OpKind::ConstInt(v) => RunValue::Int(*v),
                OpKind::ConstPred(v) => RunValue::Pred(*v),
                OpKind::Binary(bin) => {
                    let lhs = env[&op.operands[0]].as_int();
                    let rhs = env[&op.operands[1]].as_int();
                    RunValue::Int(match bin {
                        BinaryOp::Add => lhs + rhs,
                        BinaryOp::Sub => lhs - rhs,
                        BinaryOp::Mul => lhs * rhs,
                    })
                }
                OpKind::Compare(cmp) => {
                    let lhs = env[&op.operands[0]].as_int();
                    let rhs = env[&op.operands[1]].as_int();
                    RunValue::Pred(match cmp {
                        CompareOp::Eq => lhs == rhs,
                        CompareOp::Ne => lhs != rhs,
                        CompareOp::Lt => lhs < rhs,
                        CompareOp::Le => lhs <= rhs,
                        CompareOp::Gt => lhs > rhs,
                        CompareOp::Ge => lhs >= rhs,
                    })
                }
                OpKind::Extract => RunValue::Bool(env[&op.operands[0]].as_pred()),
                OpKind::Cond | OpKind::Loop => {
                    panic!("structured operation reached the evaluator; run legalize-control-flow first")
                }
            };
            env.insert(op.results[0], value);
        }

        match block.term.as_ref().expect("block has no terminator") {
            Terminator::Return { values } => {
                return Trace {
                    results: values.iter().map(|v| env[v]).collect(),
                    visits,
                };
            }
            Terminator::Branch { dest, args } => {
                incoming = args.iter().map(|v| env[v]).collect();
                current = *dest;
            }
            Terminator::CondBranch { cond, true_dest, true_args, false_dest, false_args } => {
                if env[cond].as_bool() {
                    incoming = true_args.iter().map(|v| env[v]).collect();
                    current = *true_dest;
                } else {
                    incoming = false_args.iter().map(|v| env[v]).collect();
                    current = *false_dest;
                }
            }
        }
    }
}

/// Builds `%r = cond(%p, { ret 5 }, { ret 7 })` with the predicate taken
/// from the function's only parameter
pub fn select_function() -> Function {
    let mut func = Function::new("select", vec![Type::Pred], vec![Type::Int]);
    let entry = func.entry();
    let p = func.block(entry).params[0];
    let zero = func.const_int(entry, 0, Loc::Unknown);

    let tb = func.add_block(vec![Type::Int]);
    let five = func.const_int(tb, 5, Loc::Unknown);
    func.set_terminator(tb, Terminator::Return { values: vec![five] });

    let fb = func.add_block(vec![Type::Int]);
    let seven = func.const_int(fb, 7, Loc::Unknown);
    func.set_terminator(fb, Terminator::Return { values: vec![seven] });

    let r = func.cond_op(
        entry,
        p,
        zero,
        zero,
        Region::new(vec![tb]),
        Region::new(vec![fb]),
        Type::Int,
        Loc::Unknown,
    );
    func.set_terminator(entry, Terminator::Return { values: vec![r] });
    func
}

/// Builds `%r = loop(%x0, { ret %x < limit }, { ret %x + 1 })` counting
/// upwards from the function's only parameter
pub fn counting_loop_function(limit: i64) -> Function {
    let mut func = Function::new("count_up", vec![Type::Int], vec![Type::Int]);
    let entry = func.entry();
    let x0 = func.block(entry).params[0];

    let cb = func.add_block(vec![Type::Int]);
    let x = func.block(cb).params[0];
    let bound = func.const_int(cb, limit, Loc::Unknown);
    let p = func.compare(cb, CompareOp::Lt, x, bound, Loc::Unknown);
    func.set_terminator(cb, Terminator::Return { values: vec![p] });

    let bb = func.add_block(vec![Type::Int]);
    let y = func.block(bb).params[0];
    let one = func.const_int(bb, 1, Loc::Unknown);
    let next = func.binary(bb, BinaryOp::Add, y, one, Loc::Unknown);
    func.set_terminator(bb, Terminator::Return { values: vec![next] });

    let r = func.loop_op(entry, x0, Region::new(vec![cb]), Region::new(vec![bb]), Loc::Unknown);
    func.set_terminator(entry, Terminator::Return { values: vec![r] });
    func
}

/// Installs a subscriber so pass activity shows up when debugging a failing
/// test run
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
