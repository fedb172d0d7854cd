use std::collections::HashMap;

use crate::auth::AccessControl;
use crate::constants::FEE_PPM_HARD_LIMIT;
use crate::errors::{ErrorCode, Result};
use crate::events::*;
use crate::policy::PolicyStore;
use crate::state::{CapTransition, FeeState};
use crate::types::{CallerId, Clock, PoolId};

/// Read access to the current movement cap of a pool.
pub trait MovementCapSource {
    fn movement_cap(&self, pool: &PoolId) -> Result<u32>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitializeOutcome {
    Initialized,
    AlreadyInitialized,
}

/// Fee engine: baseline plus surge per pool.
#[derive(Debug)]
pub struct DynamicFeeManager {
    access: AccessControl,
    states: Vec<FeeState>,
    pool_index: HashMap<PoolId, usize>,
}

impl DynamicFeeManager {
    pub fn new(access: AccessControl) -> Self {
        Self {
            access,
            states: Vec::new(),
            pool_index: HashMap::new(),
        }
    }

    pub fn access_control(&self) -> &AccessControl {
        &self.access
    }

    pub fn set_swap_controller(&mut self, caller: &CallerId, new_swap_controller: CallerId) -> Result<()> {
        let old_swap_controller = self.access.swap_controller;
        self.access.rotate_swap_controller(caller, new_swap_controller)?;
        SwapControllerRotated {
            old_swap_controller,
            new_swap_controller,
        }
        .emit();
        Ok(())
    }

    pub fn is_initialized(&self, pool: &PoolId) -> bool {
        self.pool_index.contains_key(pool)
    }

    pub fn state(&self, pool: &PoolId) -> Option<&FeeState> {
        self.pool_index.get(pool).map(|&i| &self.states[i])
    }

    fn state_mut(&mut self, pool: &PoolId) -> Option<&mut FeeState> {
        let i = *self.pool_index.get(pool)?;
        Some(&mut self.states[i])
    }

    /// Seeds the fee state with the policy default. Repeated calls leave
    /// the existing state untouched.
    pub fn initialize(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        clock: &Clock,
        policies: &impl PolicyStore,
    ) -> Result<InitializeOutcome> {
        self.access.require_swap_controller_or_governance(caller)?;
        if self.is_initialized(pool) {
            tracing::info!(pool = %pool, "fee state already initialized");
            return Ok(InitializeOutcome::AlreadyInitialized);
        }

        let policy = policies.validated_pool_policy(pool)?;
        let state = FeeState::new(policy.default_fee_ppm, clock.unix_timestamp);
        self.pool_index.insert(*pool, self.states.len());
        self.states.push(state);

        FeeStateInitialized {
            pool: *pool,
            baseline_fee_ppm: policy.default_fee_ppm,
        }
        .emit();
        Ok(InitializeOutcome::Initialized)
    }

    /// Fee to charge at `now`, in ppm.
    ///
    /// Quotes never fail: a pool whose policy does not validate is charged
    /// its `default_fee_ppm`, capped at `FEE_PPM_HARD_LIMIT`.
    pub fn get_current_fee(&self, pool: &PoolId, now: u64, policies: &impl PolicyStore) -> u32 {
        let policy = match policies.validated_pool_policy(pool) {
            Ok(policy) => policy,
            Err(err) => return fallback_fee(pool, policies, &err),
        };
        match self.state(pool) {
            Some(state) => state.total_fee(now, policy.surge_decay_period_seconds),
            None => policy.default_fee_ppm,
        }
    }

    /// `(baseline, decayed surge)` at `now`. Falls back like `get_current_fee`.
    pub fn get_fee_state(&self, pool: &PoolId, now: u64, policies: &impl PolicyStore) -> (u32, u32) {
        let policy = match policies.validated_pool_policy(pool) {
            Ok(policy) => policy,
            Err(err) => return (fallback_fee(pool, policies, &err), 0),
        };
        match self.state(pool) {
            Some(state) => (
                state.baseline_fee_ppm,
                state.decayed_surge(now, policy.surge_decay_period_seconds),
            ),
            None => (policy.default_fee_ppm, 0),
        }
    }

    pub fn notify_truncation_status(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        truncated: bool,
        clock: &Clock,
        policies: &impl PolicyStore,
    ) -> Result<()> {
        self.access.require_swap_controller(caller)?;
        let initial_surge_fee_ppm = policies.validated_pool_policy(pool)?.initial_surge_fee_ppm;

        let Some(state) = self.state_mut(pool) else {
            tracing::info!(pool = %pool, truncated, "truncation status for uninitialized fee state ignored");
            return Ok(());
        };

        match state.on_truncation_status(truncated, clock.unix_timestamp, initial_surge_fee_ppm) {
            Some(CapTransition::Entered) => CapEventStarted {
                pool: *pool,
                timestamp: clock.unix_timestamp,
                surge_fee_ppm: initial_surge_fee_ppm,
            }
            .emit(),
            Some(CapTransition::Exited) => CapEventEnded {
                pool: *pool,
                timestamp: clock.unix_timestamp,
            }
            .emit(),
            None => {}
        }
        Ok(())
    }

    /// Steps the baseline toward the value implied by the pool's movement cap,
    /// at most once per `base_fee_update_interval_seconds`.
    /// Returns true if the update window was consumed.
    pub fn maybe_update_baseline(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        cap_source: &impl MovementCapSource,
        clock: &Clock,
        policies: &impl PolicyStore,
    ) -> Result<bool> {
        self.access.require_swap_controller_or_governance(caller)?;
        let policy = policies.validated_pool_policy(pool)?;
        let now = clock.unix_timestamp;

        let state = self.state(pool).ok_or(ErrorCode::FeeStateNotInitialized)?;
        if now.saturating_sub(state.last_baseline_update_at) < policy.base_fee_update_interval_seconds {
            return Ok(false);
        }

        let max_move_per_update = cap_source.movement_cap(pool)?;
        let old_baseline_fee_ppm = state.baseline_fee_ppm;
        let new_baseline_fee_ppm = state.next_baseline(max_move_per_update, &policy);

        let state = self.state_mut(pool).ok_or(ErrorCode::FeeStateNotInitialized)?;
        state.baseline_fee_ppm = new_baseline_fee_ppm;
        state.last_baseline_update_at = now;

        if new_baseline_fee_ppm != old_baseline_fee_ppm {
            BaselineFeeUpdated {
                pool: *pool,
                old_baseline_fee_ppm,
                new_baseline_fee_ppm,
                max_move_per_update,
            }
            .emit();
        }
        Ok(true)
    }
}

fn fallback_fee(pool: &PoolId, policies: &impl PolicyStore, err: &ErrorCode) -> u32 {
    let fee = policies
        .pool_policy(pool)
        .default_fee_ppm
        .min(FEE_PPM_HARD_LIMIT);
    tracing::warn!(pool = %pool, error = %err, fee, "invalid pool policy, quoting default fee");
    fee
}
