pub mod dynamic_fee_manager;
pub mod swap_lifecycle;
pub mod truncated_oracle;

pub use dynamic_fee_manager::*;
pub use swap_lifecycle::*;
pub use truncated_oracle::*;
