use ordered_float::NotNan;
use std::{fmt, sync::Arc};

use crate::expression::Literal;

/// Shared handle to an immutable expression node.
pub type ExprRef = Arc<Expr>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub(crate) u32);

impl SlotId {
    pub fn index(&self) -> u32 { self.0 }
}

impl LocalId {
    pub fn index(&self) -> u32 { self.0 }
}

/// Per-row facts the row-iteration engine binds at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameInput {
    CurrentRow,
    FrameStart,
    FrameEnd,
    HasRows,
    PartitionRowCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Read of an accumulator slot.
    Slot(SlotId),
    /// Read of a local declared in the block.
    Local(LocalId),
    Input(FrameInput),
    /// Declared argument `index` of the aggregate, evaluated at partition row `row`.
    Argument { index: usize, row: ExprRef },
    Unary { op: UnaryOp, operand: ExprRef },
    Binary { op: BinaryOp, left: ExprRef, right: ExprRef },
    /// Lazy: only the selected branch is evaluated.
    Conditional { cond: ExprRef, then: ExprRef, otherwise: ExprRef },
    EmptyList,
}

impl Expr {
    pub fn literal(l: Literal) -> ExprRef { Arc::new(Expr::Literal(l)) }
    pub fn int(i: i64) -> ExprRef { Self::literal(Literal::Int(i)) }
    pub fn bool(b: bool) -> ExprRef { Self::literal(Literal::Bool(b)) }
    pub fn null() -> ExprRef { Self::literal(Literal::Null) }
    pub fn string(s: impl Into<String>) -> ExprRef { Self::literal(Literal::String(s.into())) }

    /// NaN has no SQL literal; it maps to NULL.
    pub fn float(f: f64) -> ExprRef {
        match NotNan::new(f) {
            Ok(n) => Self::literal(Literal::Float(n)),
            Err(_) => Self::null(),
        }
    }

    pub fn input(input: FrameInput) -> ExprRef { Arc::new(Expr::Input(input)) }
    pub fn empty_list() -> ExprRef { Arc::new(Expr::EmptyList) }

    pub fn argument(index: usize, row: ExprRef) -> ExprRef {
        Arc::new(Expr::Argument { index, row })
    }

    pub fn unary(op: UnaryOp, operand: ExprRef) -> ExprRef {
        Arc::new(Expr::Unary { op, operand })
    }

    pub fn binary(op: BinaryOp, left: ExprRef, right: ExprRef) -> ExprRef {
        Arc::new(Expr::Binary { op, left, right })
    }

    pub fn conditional(cond: ExprRef, then: ExprRef, otherwise: ExprRef) -> ExprRef {
        Arc::new(Expr::Conditional { cond, then, otherwise })
    }

    pub fn not(e: ExprRef) -> ExprRef { Self::unary(UnaryOp::Not, e) }
    pub fn is_null(e: ExprRef) -> ExprRef { Self::unary(UnaryOp::IsNull, e) }
    pub fn is_not_null(e: ExprRef) -> ExprRef { Self::unary(UnaryOp::IsNotNull, e) }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Collects every accumulator slot this expression reads.
    pub fn collect_slots(&self, out: &mut Vec<SlotId>) {
        match self {
            Expr::Slot(id) => out.push(*id),
            Expr::Argument { row, .. } => row.collect_slots(out),
            Expr::Unary { operand, .. } => operand.collect_slots(out),
            Expr::Binary { left, right, .. } => {
                left.collect_slots(out);
                right.collect_slots(out);
            }
            Expr::Conditional { cond, then, otherwise } => {
                cond.collect_slots(out);
                then.collect_slots(out);
                otherwise.collect_slots(out);
            }
            Expr::Literal(_) | Expr::Local(_) | Expr::Input(_) | Expr::EmptyList => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(l) => write!(f, "{}", l),
            Expr::Slot(id) => write!(f, "acc${}", id.0),
            Expr::Local(id) => write!(f, "local${}", id.0),
            Expr::Input(input) => write!(f, "{:?}", input),
            Expr::Argument { index, row } => write!(f, "arg{}@[{}]", index, row),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => write!(f, "NOT ({})", operand),
                UnaryOp::Neg => write!(f, "-({})", operand),
                UnaryOp::IsNull => write!(f, "({}) IS NULL", operand),
                UnaryOp::IsNotNull => write!(f, "({}) IS NOT NULL", operand),
            },
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op.symbol(), right),
            Expr::Conditional { cond, then, otherwise } =>
                write!(f, "CASE WHEN {} THEN {} ELSE {} END", cond, then, otherwise),
            Expr::EmptyList => write!(f, "[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_nested_tree() {
        let e = Expr::conditional(
            Expr::input(FrameInput::HasRows),
            Expr::argument(0, Expr::input(FrameInput::FrameStart)),
            Expr::null(),
        );
        assert_eq!(e.to_string(), "CASE WHEN HasRows THEN arg0@[FrameStart] ELSE NULL END");
    }

    #[test]
    fn nan_float_becomes_null() {
        assert_eq!(*Expr::float(f64::NAN), Expr::Literal(Literal::Null));
    }

    #[test]
    fn collect_slots_walks_all_branches() {
        let e = Expr::conditional(
            Expr::is_null(Arc::new(Expr::Slot(SlotId(1)))),
            Expr::int(0),
            Expr::binary(BinaryOp::Add, Arc::new(Expr::Slot(SlotId(2))), Expr::int(1)),
        );
        let mut slots = Vec::new();
        e.collect_slots(&mut slots);
        assert_eq!(slots, vec![SlotId(1), SlotId(2)]);
    }
}
