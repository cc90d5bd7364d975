pub mod expression;
pub use expression::{Block, BlockBuilder, DataType, Expr, ExprRef, Literal};

pub mod context;

pub mod implementor;
pub use implementor::{AggImplementor, ImplementorRegistry, WinAggImplementor, DEFAULT_REGISTRY};

pub mod codegen;
pub use codegen::{AggregateUnit, CodegenConfig, CodegenError, GenerationPass};

pub mod executor;
