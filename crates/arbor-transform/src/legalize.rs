//! Legalization of structured control flow
//!
//! Rewrites the two structured operations into an explicit block graph:
//!
//! ```text
//! %r = cond %p, %a, %b { ... ret %x } { ... ret %y }
//! <post operations using %r>
//! ```
//! becomes
//! ```text
//!   %f = extract %p
//!   cond_br %f, ^true(%a), ^false(%b)
//! ^true(...):          ^false(...):
//!   br ^tail(%x)         br ^tail(%y)
//! ^tail(%r):
//!   <post operations using %r>
//! ```
//!
//! and
//! ```text
//! %r = loop %x0 { ... ret %p } { ... ret %next }
//! ```
//! becomes the four-section shape predecessor -> condition <-> body,
//! condition -> tail:
//! ```text
//!   br ^cond(%x0)
//! ^cond(%x):
//!   %f = extract %p
//!   cond_br %f, ^body(%x), ^tail(%x)
//! ^body(%x):
//!   br ^cond(%next)
//! ^tail(%r):
//! ```
//!
//! The rewrite is destructive and staged: split the block at the structured
//! operation, clone its regions between the two halves, rewrite the cloned
//! region exits, rewire the result through a tail parameter, erase the
//! operation. A malformed region aborts the lowering mid-flight; nothing is
//! rolled back and the caller must discard the function.

use arbor_error::{Diagnostic, ErrorCode, Loc, Result};
use arbor_ir::{BlockId, CloneMap, Function, OpId, OpKind, Region, Terminator};

use crate::Pass;

/// Stable pipeline name of the pass
pub const PASS_NAME: &str = "legalize-control-flow";

/// Converts structured control flow into explicit branches
pub struct LegalizeControlFlow;

impl Pass for LegalizeControlFlow {
    fn name(&self) -> &'static str {
        PASS_NAME
    }

    fn description(&self) -> &'static str {
        "Legalize structured control flow into explicit branches"
    }

    fn run_on_function(&self, func: &mut Function) -> Result<()> {
        legalize_function(func)
    }
}

/// Lowers every structured operation in the function: conditionals first,
/// then loops, each category collected in one upfront traversal.
pub fn legalize_function(func: &mut Function) -> Result<()> {
    let conds = collect_ops(func, |kind| matches!(kind, OpKind::Cond));
    tracing::debug!("lowering {} conditional(s) in @{}", conds.len(), func.name);
    for op in conds {
        lower_cond(func, op)?;
    }

    let loops = collect_ops(func, |kind| matches!(kind, OpKind::Loop));
    tracing::debug!("lowering {} loop(s) in @{}", loops.len(), func.name);
    for op in loops {
        lower_loop(func, op)?;
    }
    Ok(())
}

fn collect_ops(func: &Function, want: impl Fn(&OpKind) -> bool) -> Vec<OpId> {
    let mut found = Vec::new();
    func.walk(&mut |op| {
        if want(&func.op(op).kind) {
            found.push(op);
        }
    });
    found
}

fn malformed(block: BlockId, loc: Loc) -> Diagnostic {
    Diagnostic::error(
        ErrorCode::MALFORMED_REGION,
        format!("block {} inside a structured region does not end in a region return", block),
    )
    .at(loc)
}

/// Replaces the terminator of every cloned block of `src` with a branch to
/// `target`, forwarding the values the region return yielded. Fails on any
/// exit that is not a region return.
fn replace_terminators(
    func: &mut Function,
    src: &Region,
    target: BlockId,
    loc: Loc,
    map: &CloneMap,
) -> Result<()> {
    for &old in &src.blocks {
        let block = map.block(old).expect("source block must have been cloned");
        let values = match func.block(block).term.as_ref().and_then(|t| t.as_return()) {
            Some(values) => values.to_vec(),
            None => return Err(malformed(block, loc)),
        };
        func.set_terminator(block, Terminator::Branch { dest: target, args: values });
    }
    Ok(())
}

/// Lowers one two-way structured conditional
fn lower_cond(func: &mut Function, op: OpId) -> Result<()> {
    let block = func
        .parent_block(op)
        .expect("structured operation must be placed in a block");
    let (pred, true_arg, false_arg) = {
        let data = func.op(op);
        (data.operands[0], data.operands[1], data.operands[2])
    };
    let result = func.op_result(op, 0);
    let loc = func.op(op).loc;
    let on_true = func.op(op).regions[0].clone();
    let on_false = func.op(op).regions[1].clone();

    // Everything from the conditional onwards moves to the tail block.
    let tail = func.split_block(block, op);

    // Both regions are duplicated between the two halves under one mapping.
    let mut map = CloneMap::new();
    func.clone_region_before(&on_true, tail, &mut map);
    func.clone_region_before(&on_false, tail, &mut map);
    let true_entry = map.block(on_true.entry()).expect("source block must have been cloned");
    let false_entry = map.block(on_false.entry()).expect("source block must have been cloned");

    // Reduce the predicate to a primitive boolean and branch into the
    // sides, handing each its argument.
    let flag = func.extract(block, pred, loc);
    func.set_terminator(
        block,
        Terminator::CondBranch {
            cond: flag,
            true_dest: true_entry,
            true_args: vec![true_arg],
            false_dest: false_entry,
            false_args: vec![false_arg],
        },
    );

    // Region exits converge on the tail.
    replace_terminators(func, &on_true, tail, loc, &map)?;
    replace_terminators(func, &on_false, tail, loc, &map)?;

    // The implicit result becomes an explicit tail parameter.
    let result_type = func.value_type(result);
    let joined = func.add_block_param(tail, result_type);
    func.replace_all_uses(result, joined);

    func.erase_op(op);
    Ok(())
}

/// Lowers one pre-tested structured loop
fn lower_loop(func: &mut Function, op: OpId) -> Result<()> {
    let block = func
        .parent_block(op)
        .expect("structured operation must be placed in a block");
    let init = func.op(op).operands[0];
    let result = func.op_result(op, 0);
    let loc = func.op(op).loc;
    let condition = func.op(op).regions[0].clone();
    let body = func.op(op).regions[1].clone();

    let tail = func.split_block(block, op);

    let mut map = CloneMap::new();
    func.clone_region_before(&condition, tail, &mut map);
    func.clone_region_before(&body, tail, &mut map);
    let cond_entry = map.block(condition.entry()).expect("source block must have been cloned");
    let body_entry = map.block(body.entry()).expect("source block must have been cloned");

    // The predecessor jumps into the looping check with the initial state.
    func.set_terminator(block, Terminator::Branch { dest: cond_entry, args: vec![init] });

    // Condition exits: the yielded predicate steers between another
    // iteration and the tail. Checking the condition never alters loop
    // state, so both edges reuse the condition entry's own parameters.
    let state: Vec<_> = func.block(cond_entry).params.clone();
    for &old in &condition.blocks {
        let nb = map.block(old).expect("source block must have been cloned");
        let values = match func.block(nb).term.as_ref().and_then(|t| t.as_return()) {
            Some(values) => values.to_vec(),
            None => return Err(malformed(nb, loc)),
        };
        if values.len() != 1 {
            return Err(Diagnostic::error(
                ErrorCode::MALFORMED_REGION,
                format!(
                    "condition region exit {} must yield exactly one value, found {}",
                    nb,
                    values.len()
                ),
            )
            .at(loc));
        }
        let flag = func.extract(nb, values[0], loc);
        func.set_terminator(
            nb,
            Terminator::CondBranch {
                cond: flag,
                true_dest: body_entry,
                true_args: state.clone(),
                false_dest: tail,
                false_args: state.clone(),
            },
        );
    }

    // Body exits: the yielded values are the next-iteration state.
    for &old in &body.blocks {
        let nb = map.block(old).expect("source block must have been cloned");
        let values = match func.block(nb).term.as_ref().and_then(|t| t.as_return()) {
            Some(values) => values.to_vec(),
            None => return Err(malformed(nb, loc)),
        };
        func.set_terminator(nb, Terminator::Branch { dest: cond_entry, args: values });
    }

    let result_type = func.value_type(result);
    let joined = func.add_block_param(tail, result_type);
    func.replace_all_uses(result, joined);

    func.erase_op(op);
    Ok(())
}
