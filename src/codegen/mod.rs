pub mod codegen_error;
pub use codegen_error::*;

pub mod config;
pub use config::*;

pub mod generation_pass;
pub use generation_pass::*;

pub mod aggregate_unit;
pub use aggregate_unit::*;
