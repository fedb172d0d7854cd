pub mod fee_tracker;

pub use fee_tracker::*;

#[cfg(test)]
pub mod test_utils;
#[cfg(test)]
pub use test_utils::*;
