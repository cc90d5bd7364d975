pub mod literal;
pub use literal::*;

pub mod data_type;
pub use data_type::*;

pub mod expr;
pub use expr::*;

pub mod statement;
pub use statement::*;

pub mod block_builder;
pub use block_builder::*;
