pub mod pool_policy;
pub mod registry;

pub use pool_policy::*;
pub use registry::*;

use crate::errors::Result;
use crate::types::PoolId;

/// Read-only view of the per-pool configuration.
pub trait PolicyStore {
    /// Policy of `pool`, falling back to the global default.
    fn pool_policy(&self, pool: &PoolId) -> PoolPolicy;

    fn is_tick_spacing_supported(&self, tick_spacing: u16) -> bool;

    /// Policy of `pool`, rejected if it violates a configuration invariant.
    fn validated_pool_policy(&self, pool: &PoolId) -> Result<PoolPolicy> {
        let policy = self.pool_policy(pool);
        policy.validate()?;
        Ok(policy)
    }
}
