pub mod eval_error;
pub use eval_error::*;

pub mod interpreter;
pub use interpreter::*;
