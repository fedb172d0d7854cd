use crate::constants::FEE_PPM_HARD_LIMIT;
use crate::manager::DynamicFeeManager;
use crate::policy::PolicyStore;
use crate::types::PoolId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FeeSnapshot {
    pub base_fee_ppm: u32,
    pub surge_fee_ppm: u32,
    pub total_fee_ppm: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CapEdge {
    Start,
    End,
}

/// Follows the fee state of one pool across simulation steps.
///
/// A pool counts as in a CAP event while its decayed surge is non-zero,
/// so a CAP event ends once the surge has fully decayed.
#[derive(Clone, Debug)]
pub struct FeeTracker {
    pool: PoolId,
    last_in_cap: bool,
    cap_event_count: u32,
}

impl FeeTracker {
    pub fn new(pool: PoolId) -> Self {
        Self {
            pool,
            last_in_cap: false,
            cap_event_count: 0,
        }
    }

    pub fn pool(&self) -> &PoolId {
        &self.pool
    }

    pub fn in_cap(&self) -> bool {
        self.last_in_cap
    }

    pub fn cap_event_count(&self) -> u32 {
        self.cap_event_count
    }

    pub fn snapshot(&self, fees: &DynamicFeeManager, now: u64, policies: &impl PolicyStore) -> FeeSnapshot {
        let (base_fee_ppm, surge_fee_ppm) = fees.get_fee_state(&self.pool, now, policies);
        let total_fee_ppm = base_fee_ppm.saturating_add(surge_fee_ppm).min(FEE_PPM_HARD_LIMIT);
        FeeSnapshot {
            base_fee_ppm,
            surge_fee_ppm,
            total_fee_ppm,
        }
    }

    /// Takes a snapshot, logs it and reports a CAP edge if one occurred
    /// since the previous call.
    pub fn record(
        &mut self,
        fees: &DynamicFeeManager,
        now: u64,
        policies: &impl PolicyStore,
        label: &str,
    ) -> (FeeSnapshot, Option<CapEdge>) {
        let snapshot = self.snapshot(fees, now, policies);
        tracing::info!(
            pool = %self.pool,
            label,
            base_fee_ppm = snapshot.base_fee_ppm,
            surge_fee_ppm = snapshot.surge_fee_ppm,
            total_fee_ppm = snapshot.total_fee_ppm,
            "fee snapshot"
        );

        let in_cap = snapshot.surge_fee_ppm > 0;
        let edge = match (in_cap, self.last_in_cap) {
            (true, false) => {
                self.cap_event_count += 1;
                tracing::info!(pool = %self.pool, label, "CAP event start");
                Some(CapEdge::Start)
            }
            (false, true) => {
                tracing::info!(pool = %self.pool, label, "CAP event end");
                Some(CapEdge::End)
            }
            _ => None,
        };
        self.last_in_cap = in_cap;

        (snapshot, edge)
    }
}
