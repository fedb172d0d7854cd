use std::collections::HashMap;

use crate::auth::AccessControl;
use crate::constants::{DYNAMIC_FEE_FLAG, MAX_TICK, MIN_TICK};
use crate::errors::{ErrorCode, Result};
use crate::events::*;
use crate::manager::MovementCapSource;
use crate::math::floor_division;
use crate::policy::PolicyStore;
use crate::state::{Observation, OracleState};
use crate::types::{CallerId, Clock, PoolId, PoolSnapshot};

/// Truncating price oracle for every enabled pool.
///
/// Each push clamps the incoming tick to the pool's `max_move_per_update`
/// before it is recorded, and the cap is re-tuned toward the policy's
/// target truncation frequency.
#[derive(Debug)]
pub struct TruncatedOracle {
    access: AccessControl,
    states: Vec<OracleState>,
    pool_index: HashMap<PoolId, usize>,
}

impl TruncatedOracle {
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

    pub fn is_enabled(&self, pool: &PoolId) -> bool {
        self.pool_index.contains_key(pool)
    }

    pub fn state(&self, pool: &PoolId) -> Option<&OracleState> {
        self.pool_index.get(pool).map(|&i| &self.states[i])
    }

    fn state_mut(&mut self, pool: &PoolId) -> Result<&mut OracleState> {
        let i = *self.pool_index.get(pool).ok_or(ErrorCode::OracleNotEnabled)?;
        Ok(&mut self.states[i])
    }

    fn enabled_state(&self, pool: &PoolId) -> Result<&OracleState> {
        self.state(pool).ok_or(ErrorCode::OracleNotEnabled)
    }

    /// Starts recording a pool. The initial cap is clamped into the policy bounds.
    pub fn enable(
        &mut self,
        caller: &CallerId,
        pool_config: &PoolSnapshot,
        initial_cap: u32,
        clock: &Clock,
        policies: &impl PolicyStore,
    ) -> Result<()> {
        self.access.require_swap_controller_or_governance(caller)?;
        if self.is_enabled(&pool_config.pool) {
            return Err(ErrorCode::OracleAlreadyEnabled);
        }
        if !policies.is_tick_spacing_supported(pool_config.tick_spacing) {
            return Err(ErrorCode::UnsupportedTickSpacing);
        }
        if pool_config.fee & DYNAMIC_FEE_FLAG == 0 {
            return Err(ErrorCode::UnsupportedFeeConfiguration);
        }
        check_tick_index(pool_config.tick_current_index)?;

        let policy = policies.validated_pool_policy(&pool_config.pool)?;
        let max_move_per_update = policy.clamp_cap(initial_cap);

        let state = OracleState::new(
            pool_config.pool,
            pool_config.tick_current_index,
            max_move_per_update,
            clock.unix_timestamp,
        );
        self.pool_index.insert(pool_config.pool, self.states.len());
        self.states.push(state);

        OracleEnabled {
            pool: pool_config.pool,
            tick: pool_config.tick_current_index,
            max_move_per_update,
        }
        .emit();
        Ok(())
    }

    /// Records the post-trade tick of a pool and reports whether it had to
    /// be truncated. Either every step of the update is applied or none is.
    pub fn push_observation_and_check_cap(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        incoming_tick: i32,
        clock: &Clock,
        policies: &impl PolicyStore,
    ) -> Result<bool> {
        self.access.require_swap_controller(caller)?;
        check_tick_index(incoming_tick)?;
        let policy = policies.validated_pool_policy(pool)?;
        let state = self.state_mut(pool)?;

        let truncated_tick = state.truncate(incoming_tick);
        let next_observation = state.next_observation(clock.unix_timestamp, truncated_tick.tick)?;

        if let Some(observation) = next_observation {
            state.write(observation);
        }
        state.decay_truncation_budget(clock.unix_timestamp, policy.budget_decay_window_seconds);
        if truncated_tick.truncated {
            state.record_truncation();
        }

        tracing::debug!(
            pool = %pool,
            incoming_tick,
            recorded_tick = truncated_tick.tick,
            truncated = truncated_tick.truncated,
            truncation_budget = state.truncation_budget,
            "oracle push"
        );

        if let Some(adjustment) = state.auto_tune(&policy, clock) {
            MaxMoveUpdated {
                pool: *pool,
                old_cap: adjustment.old_cap,
                new_cap: adjustment.new_cap,
                truncation_budget: state.truncation_budget,
            }
            .emit();
        }

        Ok(truncated_tick.truncated)
    }

    /// Cumulative ticks at each of `seconds_agos` before `now`.
    pub fn observe(&self, pool: &PoolId, seconds_agos: &[u64], now: u64) -> Result<Vec<i64>> {
        let state = self.enabled_state(pool)?;
        seconds_agos
            .iter()
            .map(|&seconds_ago| state.observe_single(now, seconds_ago))
            .collect()
    }

    /// Time-weighted mean tick over the last `seconds_ago` seconds.
    /// A zero window returns the latest recorded tick.
    pub fn consult(&self, pool: &PoolId, seconds_ago: u64, now: u64) -> Result<i32> {
        let state = self.enabled_state(pool)?;
        if seconds_ago == 0 {
            return Ok(state.latest().tick);
        }

        let start = state.observe_single(now, seconds_ago)?;
        let end = state.observe_single(now, 0)?;
        let delta = end.checked_sub(start).ok_or(ErrorCode::ArithmeticOverflow)?;
        let mean = floor_division(delta, i64::try_from(seconds_ago)?);
        Ok(i32::try_from(mean)?)
    }

    pub fn latest_observation(&self, pool: &PoolId) -> Result<Observation> {
        Ok(self.enabled_state(pool)?.latest())
    }

    pub fn max_move_per_update(&self, pool: &PoolId) -> Result<u32> {
        Ok(self.enabled_state(pool)?.max_move_per_update)
    }

    /// Lets the ring keep up to `cardinality_next` observations. Never shrinks.
    pub fn increase_cardinality_next(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        cardinality_next: u32,
    ) -> Result<u32> {
        self.access.require_swap_controller_or_governance(caller)?;
        let state = self.state_mut(pool)?;
        let cardinality_next_old = state.cardinality_next;
        let cardinality_next_new = state.grow(cardinality_next)?;

        if cardinality_next_new != cardinality_next_old {
            ObservationCardinalityIncreased {
                pool: *pool,
                cardinality_next_old,
                cardinality_next_new,
            }
            .emit();
        }
        Ok(cardinality_next_new)
    }

    /// Re-reads the pool policy and clamps the cap into its bounds.
    /// Allowed once per pool per slot.
    pub fn refresh_cap_policy(
        &mut self,
        caller: &CallerId,
        pool: &PoolId,
        clock: &Clock,
        policies: &impl PolicyStore,
    ) -> Result<u32> {
        self.access.require_governance(caller)?;
        let policy = policies.validated_pool_policy(pool)?;
        let state = self.state_mut(pool)?;
        if state.last_policy_refresh_slot == Some(clock.slot) {
            return Err(ErrorCode::PolicyRefreshRateLimited);
        }

        state.last_policy_refresh_slot = Some(clock.slot);
        let old_cap = state.max_move_per_update;
        let new_cap = policy.clamp_cap(old_cap);
        state.max_move_per_update = new_cap;

        if new_cap != old_cap {
            MaxMoveUpdated {
                pool: *pool,
                old_cap,
                new_cap,
                truncation_budget: state.truncation_budget,
            }
            .emit();
        }
        CapPolicyRefreshed {
            pool: *pool,
            slot: clock.slot,
            max_move_per_update: new_cap,
        }
        .emit();
        Ok(new_cap)
    }

    pub fn set_auto_tune_paused(&mut self, caller: &CallerId, pool: &PoolId, paused: bool) -> Result<()> {
        self.access.require_governance(caller)?;
        let state = self.state_mut(pool)?;
        state.auto_tune_paused = paused;
        AutoTunePaused { pool: *pool, paused }.emit();
        Ok(())
    }
}

impl MovementCapSource for TruncatedOracle {
    fn movement_cap(&self, pool: &PoolId) -> Result<u32> {
        self.max_move_per_update(pool)
    }
}

fn check_tick_index(tick: i32) -> Result<()> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(ErrorCode::InvalidTickIndex);
    }
    Ok(())
}
