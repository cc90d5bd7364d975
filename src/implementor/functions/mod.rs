pub mod count_impl;
pub use count_impl::*;

pub mod sum_impl;
pub use sum_impl::*;

pub mod avg_impl;
pub use avg_impl::*;

pub mod minmax_impl;
pub use minmax_impl::*;

pub mod array_agg_impl;
pub use array_agg_impl::*;

pub mod first_last_impl;
pub use first_last_impl::*;

pub mod lag_lead_impl;
pub use lag_lead_impl::*;

pub mod row_number_impl;
pub use row_number_impl::*;
