//! Structural verification of a function graph
//!
//! Checks the invariants later stages rely on: every placed block carries a
//! terminator, operand and region arities match the operation kind, branch
//! conditions are primitive booleans, and blocks inside structured regions
//! end in a region return. Returns the first violation found.

use crate::function::{Function, Region};
use crate::op::{OpKind, Terminator};
use arbor_error::{Diagnostic, ErrorCode, Result};

fn operand_count(kind: &OpKind) -> usize {
    match kind {
        OpKind::ConstInt(_) | OpKind::ConstPred(_) => 0,
        OpKind::Extract | OpKind::Loop => 1,
        OpKind::Binary(_) | OpKind::Compare(_) => 2,
        OpKind::Cond => 3,
    }
}

fn region_count(kind: &OpKind) -> usize {
    if kind.is_structured() {
        2
    } else {
        0
    }
}

/// Verifies the whole function, nested regions included
pub fn verify_function(func: &Function) -> Result<()> {
    verify_region(func, &func.body, false)
}

fn verify_region(func: &Function, region: &Region, structured: bool) -> Result<()> {
    if structured && region.is_empty() {
        return Err(Diagnostic::error(
            ErrorCode::EMPTY_REGION,
            "structured region has no entry block",
        ));
    }
    for &b in &region.blocks {
        let block = func.block(b);
        let term = match &block.term {
            Some(term) => term,
            None => {
                return Err(Diagnostic::error(
                    ErrorCode::UNTERMINATED_BLOCK,
                    format!("block {} has no terminator", b),
                ))
            }
        };
        if structured && term.as_return().is_none() {
            return Err(Diagnostic::error(
                ErrorCode::MALFORMED_REGION,
                format!("block {} inside a structured region does not end in a region return", b),
            ));
        }
        if let Terminator::CondBranch { cond, .. } = term {
            if !func.value_type(*cond).is_branch_condition() {
                return Err(Diagnostic::error(
                    ErrorCode::BRANCH_CONDITION,
                    format!("conditional branch in {} steers on a non-boolean value", b),
                ));
            }
        }
        for &id in &block.ops {
            let op = func.op(id);
            if op.operands.len() != operand_count(&op.kind) {
                return Err(Diagnostic::error(
                    ErrorCode::OPERAND_ARITY,
                    format!(
                        "operation in {} expects {} operands, found {}",
                        b,
                        operand_count(&op.kind),
                        op.operands.len()
                    ),
                )
                .at(op.loc));
            }
            if op.regions.len() != region_count(&op.kind) {
                return Err(Diagnostic::error(
                    ErrorCode::OPERAND_ARITY,
                    format!("operation in {} carries an unexpected number of regions", b),
                )
                .at(op.loc));
            }
            if op.results.len() != 1 {
                return Err(Diagnostic::error(
                    ErrorCode::OPERAND_ARITY,
                    format!("operation in {} must produce exactly one result", b),
                )
                .at(op.loc));
            }
            if matches!(op.kind, OpKind::Loop) {
                let init = func.value_type(op.operands[0]);
                let result = func.value_type(op.results[0]);
                if init != result {
                    return Err(Diagnostic::error(
                        ErrorCode::RESULT_TYPE,
                        format!("loop in {} must produce its initial argument's type", b),
                    )
                    .at(op.loc));
                }
            }
            for nested in &op.regions {
                verify_region(func, nested, true)?;
            }
        }
    }
    Ok(())
}
