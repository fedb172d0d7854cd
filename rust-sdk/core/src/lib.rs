//! Truncating price oracle and dynamic fee engine for AMM pools.
//!
//! The oracle records one observation per pool update, clamping each tick
//! move to a self-tuning cap. The fee engine charges a baseline fee derived
//! from that cap plus a surge fee triggered by truncation.

pub mod auth;
pub mod constants;
pub mod errors;
pub mod events;
pub mod manager;
pub mod math;
pub mod policy;
pub mod state;
pub mod types;
pub mod util;

pub use errors::{ErrorCode, Result};
pub use manager::{
    AfterSwapOutcome, DynamicFeeManager, InitializeOutcome, MovementCapSource, SwapLifecycle,
    TruncatedOracle,
};
pub use policy::{PolicyRegistry, PolicyStore, PoolPolicy};
pub use types::*;
