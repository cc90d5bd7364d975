pub mod agg_implementor;
pub use agg_implementor::*;

pub mod implementor_registry;
pub use implementor_registry::*;

pub mod functions;
pub use functions::*;
