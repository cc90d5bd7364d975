pub mod agg_context;
pub use agg_context::*;

pub mod accumulator;
pub use accumulator::*;

pub mod reset_context;
pub use reset_context::*;

pub mod result_context;
pub use result_context::*;

pub mod frame;
pub use frame::*;

pub mod row_translator;
pub use row_translator::*;

pub mod win_reset_context;
pub use win_reset_context::*;

pub mod win_add_context;
pub use win_add_context::*;

pub mod win_result_context;
pub use win_result_context::*;
