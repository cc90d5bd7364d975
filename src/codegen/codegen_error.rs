use std::fmt::{self, Display};

use crate::expression::{DataType, SlotId};

/// Build-time failure while generating code for an aggregate.
///
/// None of these surface at query execution; a failed pass fails plan compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum CodegenError {
    FunctionNotFound(String),
    FunctionArgMismatch { name: String, expected: String, got: Vec<DataType> },
    /// Argument list length differs from the aggregate's declared arity.
    ArgumentArity { name: String, expected: usize, got: usize },
    /// Accumulator length differs from the implementor's state layout.
    AccumulatorArity { name: String, expected: usize, got: usize },
    /// Emitted code touched a slot that belongs to another evaluation unit.
    ForeignSlot { name: String, slot: SlotId },
    ResultWritesState { name: String, slot: SlotId },
    MergeMismatch { name: String, other: String },
    PhaseOrder { name: String, phase: &'static str, state: &'static str },
    WindowOnly(String),
    Unsupported { name: String, phase: &'static str },
    InvalidIdentifier(String),
    InvalidFrame(String),
    Other(String),
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::FunctionNotFound(name) => write!(f, "aggregate function '{}' not found", name),
            CodegenError::FunctionArgMismatch { name, expected, got } =>
                write!(f, "{}: expected {}, got {:?}", name, expected, got),
            CodegenError::ArgumentArity { name, expected, got } =>
                write!(f, "{}: expected {} argument(s), got {}", name, expected, got),
            CodegenError::AccumulatorArity { name, expected, got } =>
                write!(f, "{}: expected {} accumulator slot(s), got {}", name, expected, got),
            CodegenError::ForeignSlot { name, slot } =>
                write!(f, "{}: emitted code references foreign accumulator slot acc${}", name, slot.index()),
            CodegenError::ResultWritesState { name, slot } =>
                write!(f, "{}: result phase writes accumulator slot acc${}", name, slot.index()),
            CodegenError::MergeMismatch { name, other } =>
                write!(f, "{}: cannot merge state of differently typed call {}", name, other),
            CodegenError::PhaseOrder { name, phase, state } =>
                write!(f, "{}: cannot run {} while {}", name, phase, state),
            CodegenError::WindowOnly(name) =>
                write!(f, "{} can only be used as a window aggregate", name),
            CodegenError::Unsupported { name, phase } =>
                write!(f, "{} does not implement the {} phase", name, phase),
            CodegenError::InvalidIdentifier(id) => write!(f, "invalid identifier '{}'", id),
            CodegenError::InvalidFrame(msg) => write!(f, "invalid window frame: {}", msg),
            CodegenError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CodegenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_aggregate() {
        let e = CodegenError::ArgumentArity { name: "sum".into(), expected: 1, got: 2 };
        assert_eq!(e.to_string(), "sum: expected 1 argument(s), got 2");

        let e = CodegenError::PhaseOrder { name: "count".into(), phase: "add", state: "uninitialized" };
        assert_eq!(e.to_string(), "count: cannot run add while uninitialized");
    }
}
