use std::fmt::{self, Display};

use crate::expression::{FrameInput, LocalId, SlotId};

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnboundInput(FrameInput),
    /// Argument read at a row that is not a valid partition position.
    RowOutOfPartition { row: String, rows: usize },
    ArgumentOutOfRange { index: usize, arity: usize },
    UnsetSlot(SlotId),
    UnsetLocal(LocalId),
    DivisionByZero,
    TypeMismatch(String),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundInput(input) => write!(f, "frame input {:?} is not bound", input),
            EvalError::RowOutOfPartition { row, rows } =>
                write!(f, "row {} outside partition of {} row(s)", row, rows),
            EvalError::ArgumentOutOfRange { index, arity } =>
                write!(f, "argument {} out of range for row with {} value(s)", index, arity),
            EvalError::UnsetSlot(slot) => write!(f, "accumulator slot acc${} read before reset", slot.index()),
            EvalError::UnsetLocal(local) => write!(f, "local${} read before declaration", local.index()),
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::TypeMismatch(msg) => write!(f, "type mismatch: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}
