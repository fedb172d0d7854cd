use std::collections::HashSet;

use super::{DynamicFeeManager, InitializeOutcome, TruncatedOracle};
use crate::auth::AccessControl;
use crate::errors::{ErrorCode, Result};
use crate::policy::PolicyStore;
use crate::types::{CallerId, Clock, PoolId, PoolSnapshot};

/// What happened after a swap once the oracle accepted the new tick.
///
/// Fee engine failures never abort a swap, they are reported here instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AfterSwapOutcome {
    pub truncated: bool,
    pub baseline_updated: bool,
    pub fee_notification_error: Option<ErrorCode>,
    pub baseline_update_error: Option<ErrorCode>,
}

/// Drives the oracle and the fee engine in the order a swap requires:
/// quote the fee, let the trade execute, record the tick, forward the
/// truncation signal.
#[derive(Debug)]
pub struct SwapLifecycle<P: PolicyStore> {
    oracle: TruncatedOracle,
    fees: DynamicFeeManager,
    policies: P,
    in_flight: HashSet<PoolId>,
}

impl<P: PolicyStore> SwapLifecycle<P> {
    pub fn new(access: AccessControl, policies: P) -> Self {
        Self {
            oracle: TruncatedOracle::new(access),
            fees: DynamicFeeManager::new(access),
            policies,
            in_flight: HashSet::new(),
        }
    }

    pub fn oracle(&self) -> &TruncatedOracle {
        &self.oracle
    }

    #[cfg(test)]
    pub(crate) fn oracle_mut(&mut self) -> &mut TruncatedOracle {
        &mut self.oracle
    }

    pub fn fees(&self) -> &DynamicFeeManager {
        &self.fees
    }

    pub fn policies(&self) -> &P {
        &self.policies
    }

    pub fn policies_mut(&mut self) -> &mut P {
        &mut self.policies
    }

    pub fn is_in_flight(&self, pool: &PoolId) -> bool {
        self.in_flight.contains(pool)
    }

    /// Enables the oracle, then seeds the fee state.
    pub fn after_initialize(
        &mut self,
        caller: &CallerId,
        pool_config: &PoolSnapshot,
        initial_cap: u32,
        clock: &Clock,
    ) -> Result<InitializeOutcome> {
        self.oracle
            .enable(caller, pool_config, initial_cap, clock, &self.policies)?;
        self.fees
            .initialize(caller, &pool_config.pool, clock, &self.policies)
    }

    /// Marks the pool as having a swap in flight and returns the fee to charge.
    pub fn before_swap(&mut self, caller: &CallerId, pool: &PoolId, now: u64) -> Result<u32> {
        self.oracle.access_control().require_swap_controller(caller)?;
        if !self.in_flight.insert(*pool) {
            return Err(ErrorCode::ReentrantCall);
        }
        Ok(self.fees.get_current_fee(pool, now, &self.policies))
    }

    /// Records the post-swap tick and updates the fee state.
    ///
    /// Must follow a `before_swap` on the same pool. An oracle failure is
    /// returned as is and the swap must be aborted. Once the swap is
    /// accepted, the in-flight mark is released on every path.
    pub fn after_swap(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        tick: i32,
        clock: &Clock,
    ) -> Result<AfterSwapOutcome> {
        self.oracle.access_control().require_swap_controller(caller)?;
        if !self.in_flight.contains(pool) {
            tracing::warn!(pool = %pool, "after_swap without a matching before_swap");
            return Err(ErrorCode::SwapNotInFlight);
        }

        let truncated =
            match self
                .oracle
                .push_observation_and_check_cap(caller, pool, tick, clock, &self.policies)
            {
                Ok(truncated) => truncated,
                Err(err) => {
                    self.in_flight.remove(pool);
                    return Err(err);
                }
            };

        let mut outcome = AfterSwapOutcome {
            truncated,
            baseline_updated: false,
            fee_notification_error: None,
            baseline_update_error: None,
        };

        if let Err(err) = self
            .fees
            .notify_truncation_status(caller, pool, truncated, clock, &self.policies)
        {
            tracing::warn!(pool = %pool, error = %err, "fee notification failed");
            outcome.fee_notification_error = Some(err);
        }

        match self
            .fees
            .maybe_update_baseline(caller, pool, &self.oracle, clock, &self.policies)
        {
            Ok(updated) => outcome.baseline_updated = updated,
            Err(err) => {
                tracing::warn!(pool = %pool, error = %err, "baseline update failed");
                outcome.baseline_update_error = Some(err);
            }
        }

        self.in_flight.remove(pool);
        Ok(outcome)
    }

    /// Releases the in-flight mark of a swap that did not execute.
    pub fn abort_swap(&mut self, caller: &CallerId, pool: &PoolId) -> Result<()> {
        self.oracle.access_control().require_swap_controller(caller)?;
        self.in_flight.remove(pool);
        Ok(())
    }

    /// Rotates the swap controller of both components, or neither.
    pub fn set_swap_controller(&mut self, caller: &CallerId, new_swap_controller: CallerId) -> Result<()> {
        self.oracle.access_control().require_governance(caller)?;
        self.fees.access_control().require_governance(caller)?;
        self.oracle.set_swap_controller(caller, new_swap_controller)?;
        self.fees.set_swap_controller(caller, new_swap_controller)
    }

    pub fn increase_cardinality_next(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        cardinality_next: u32,
    ) -> Result<u32> {
        self.oracle
            .increase_cardinality_next(caller, pool, cardinality_next)
    }

    pub fn refresh_cap_policy(&mut self, caller: &CallerId, pool: &PoolId, clock: &Clock) -> Result<u32> {
        self.oracle
            .refresh_cap_policy(caller, pool, clock, &self.policies)
    }

    pub fn set_auto_tune_paused(&mut self, caller: &CallerId, pool: &PoolId, paused: bool) -> Result<()> {
        self.oracle.set_auto_tune_paused(caller, pool, paused)
    }
}
