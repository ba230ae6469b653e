//! IR Operations and terminators
//!
//! Operations are stored in a per-function arena and referenced by stable
//! ids, so a worklist collected before a rewrite stays valid while blocks
//! are split and regions cloned around it.

use crate::function::Region;
use arbor_error::Loc;
use std::fmt;

/// SSA value id, stable for the lifetime of the function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Value(pub u32);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Basic block id, stable for the lifetime of the function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// Operation id, stable for the lifetime of the function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub u32);

/// Binary arithmetic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "add"),
            BinaryOp::Sub => write!(f, "sub"),
            BinaryOp::Mul => write!(f, "mul"),
        }
    }
}

/// Comparison operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "eq"),
            CompareOp::Ne => write!(f, "ne"),
            CompareOp::Lt => write!(f, "lt"),
            CompareOp::Le => write!(f, "le"),
            CompareOp::Gt => write!(f, "gt"),
            CompareOp::Ge => write!(f, "ge"),
        }
    }
}

/// Operation kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpKind {
    /// Integer constant
    ConstInt(i64),
    /// Predicate constant (single-element boolean container)
    ConstPred(bool),
    /// Binary arithmetic on integers
    Binary(BinaryOp),
    /// Integer comparison, yields a predicate
    Compare(CompareOp),
    /// Reads the boolean out of a predicate
    Extract,
    /// Two-way structured conditional.
    /// Operands: `[pred, true_arg, false_arg]`; regions: `[on_true, on_false]`.
    Cond,
    /// Pre-tested structured loop.
    /// Operand: `[init]`; regions: `[condition, body]`.
    Loop,
}

impl OpKind {
    /// Checks if the operation owns nested regions with an implicit result
    pub fn is_structured(&self) -> bool {
        matches!(self, OpKind::Cond | OpKind::Loop)
    }
}

/// One operation: ordered operands, ordered results, owned nested regions
#[derive(Debug, Clone)]
pub struct Op {
    pub kind: OpKind,
    pub operands: Vec<Value>,
    pub results: Vec<Value>,
    pub regions: Vec<Region>,
    pub loc: Loc,
}

/// Block terminators. A closed set: rewrites query the concrete kind with
/// the `as_*` accessors and fail when the cast does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    /// Returns values to the caller, or yields them out of a structured
    /// region when the block lives inside one.
    Return { values: Vec<Value> },
    /// Unconditional branch carrying block arguments
    Branch { dest: BlockId, args: Vec<Value> },
    /// Conditional branch; `cond` must be a primitive boolean
    CondBranch {
        cond: Value,
        true_dest: BlockId,
        true_args: Vec<Value>,
        false_dest: BlockId,
        false_args: Vec<Value>,
    },
}

impl Terminator {
    /// Cast-or-fail query for region exits
    pub fn as_return(&self) -> Option<&[Value]> {
        match self {
            Terminator::Return { values } => Some(values),
            _ => None,
        }
    }

    /// Blocks this terminator may transfer control to
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Return { .. } => Vec::new(),
            Terminator::Branch { dest, .. } => vec![*dest],
            Terminator::CondBranch { true_dest, false_dest, .. } => vec![*true_dest, *false_dest],
        }
    }

    /// Substitutes `from` for `to` in every value position
    pub fn replace_value(&mut self, from: Value, to: Value) {
        let subst = |values: &mut Vec<Value>| {
            for v in values.iter_mut() {
                if *v == from {
                    *v = to;
                }
            }
        };
        match self {
            Terminator::Return { values } => subst(values),
            Terminator::Branch { args, .. } => subst(args),
            Terminator::CondBranch { cond, true_args, false_args, .. } => {
                if *cond == from {
                    *cond = to;
                }
                subst(true_args);
                subst(false_args);
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Value]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    write!(f, "(")?;
    for (i, v) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, ")")
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Return { values } => {
                write!(f, "ret")?;
                for (i, v) in values.iter().enumerate() {
                    if i == 0 {
                        write!(f, " {}", v)?;
                    } else {
                        write!(f, ", {}", v)?;
                    }
                }
                Ok(())
            }
            Terminator::Branch { dest, args } => {
                write!(f, "br {}", dest)?;
                write_args(f, args)
            }
            Terminator::CondBranch { cond, true_dest, true_args, false_dest, false_args } => {
                write!(f, "cond_br {}, {}", cond, true_dest)?;
                write_args(f, true_args)?;
                write!(f, ", {}", false_dest)?;
                write_args(f, false_args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_display() {
        let term = Terminator::Branch { dest: BlockId(3), args: vec![Value(1), Value(2)] };
        assert_eq!(term.to_string(), "br bb3(%1, %2)");

        let term = Terminator::CondBranch {
            cond: Value(4),
            true_dest: BlockId(1),
            true_args: vec![Value(0)],
            false_dest: BlockId(2),
            false_args: vec![Value(0)],
        };
        assert_eq!(term.to_string(), "cond_br %4, bb1(%0), bb2(%0)");

        let term = Terminator::Return { values: vec![Value(7)] };
        assert_eq!(term.to_string(), "ret %7");
    }

    #[test]
    fn test_as_return() {
        let term = Terminator::Return { values: vec![Value(1)] };
        assert_eq!(term.as_return(), Some(&[Value(1)][..]));

        let term = Terminator::Branch { dest: BlockId(0), args: Vec::new() };
        assert!(term.as_return().is_none());
    }

    #[test]
    fn test_replace_value() {
        let mut term = Terminator::CondBranch {
            cond: Value(1),
            true_dest: BlockId(1),
            true_args: vec![Value(1), Value(2)],
            false_dest: BlockId(2),
            false_args: vec![Value(2)],
        };
        term.replace_value(Value(1), Value(9));
        assert_eq!(
            term,
            Terminator::CondBranch {
                cond: Value(9),
                true_dest: BlockId(1),
                true_args: vec![Value(9), Value(2)],
                false_dest: BlockId(2),
                false_args: vec![Value(2)],
            }
        );
    }

    #[test]
    fn test_structured_kinds() {
        assert!(OpKind::Cond.is_structured());
        assert!(OpKind::Loop.is_structured());
        assert!(!OpKind::Extract.is_structured());
    }
}
