use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{PolicyStore, PoolPolicy};
use crate::constants::DEFAULT_SUPPORTED_TICK_SPACINGS;
use crate::errors::{ErrorCode, Result};
use crate::types::PoolId;

/// In-memory policy store: a global default, per-pool overrides and the
/// list of tick spacings the oracle accepts.
///
/// ```toml
/// supported_tick_spacings = [10, 60, 200]
///
/// [default_policy]
/// min_cap = 10
/// max_cap = 1000
///
/// [pools."0x0101010101010101010101010101010101010101010101010101010101010101"]
/// initial_surge_fee_ppm = 20000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyRegistry {
    #[serde(default)]
    pub default_policy: PoolPolicy,
    #[serde(default = "d_supported_tick_spacings")]
    pub supported_tick_spacings: Vec<u16>,
    #[serde(default)]
    pub pools: HashMap<PoolId, PoolPolicy>,
}

fn d_supported_tick_spacings() -> Vec<u16> {
    DEFAULT_SUPPORTED_TICK_SPACINGS.to_vec()
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new(PoolPolicy::default())
    }
}

impl PolicyRegistry {
    pub fn new(default_policy: PoolPolicy) -> Self {
        Self {
            default_policy,
            supported_tick_spacings: d_supported_tick_spacings(),
            pools: HashMap::new(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let registry: PolicyRegistry = toml::from_str(s)?;
        tracing::debug!(
            pools = registry.pools.len(),
            tick_spacings = ?registry.supported_tick_spacings,
            "loaded pool policy registry"
        );
        Ok(registry)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ErrorCode::PolicyParse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn with_supported_tick_spacings(mut self, tick_spacings: &[u16]) -> Self {
        self.supported_tick_spacings = tick_spacings.to_vec();
        self
    }

    pub fn set_default_policy(&mut self, policy: PoolPolicy) {
        self.default_policy = policy;
    }

    pub fn set_pool_policy(&mut self, pool: PoolId, policy: PoolPolicy) {
        self.pools.insert(pool, policy);
    }

    pub fn remove_pool_policy(&mut self, pool: &PoolId) -> Option<PoolPolicy> {
        self.pools.remove(pool)
    }
}

impl PolicyStore for PolicyRegistry {
    fn pool_policy(&self, pool: &PoolId) -> PoolPolicy {
        self.pools.get(pool).copied().unwrap_or(self.default_policy)
    }

    fn is_tick_spacing_supported(&self, tick_spacing: u16) -> bool {
        self.supported_tick_spacings.contains(&tick_spacing)
    }
}
