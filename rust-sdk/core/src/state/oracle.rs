use super::{Observation, ObservationPages};
use crate::constants::{MAX_CARDINALITY, TRUNCATION_BUDGET_UNIT};
use crate::errors::{ErrorCode, Result};
use crate::math::{apply_ppm, linear_decay};
use crate::policy::PoolPolicy;
use crate::types::{Clock, PoolId};

/// Per-pool state of the truncating oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleState {
    pub pool: PoolId,
    pub observations: ObservationPages,
    /// Slot of the most recent observation.
    pub index: u32,
    /// Number of slots in use.
    pub cardinality: u32,
    /// Number of slots the ring is allowed to grow to.
    pub cardinality_next: u32,

    /// Largest tick movement recorded by a single update.
    pub max_move_per_update: u32,
    /// Decaying count of recent truncations, `TRUNCATION_BUDGET_UNIT` per event.
    pub truncation_budget: u64,
    pub last_budget_update_timestamp: u64,

    pub last_tune_timestamp: u64,
    /// Slot of the last auto-tune evaluation.
    pub last_tune_slot: Option<u64>,
    pub auto_tune_paused: bool,
    pub last_policy_refresh_slot: Option<u64>,
}

/// Result of moving an incoming tick through the cap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TruncatedTick {
    pub tick: i32,
    pub truncated: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CapAdjustment {
    pub old_cap: u32,
    pub new_cap: u32,
}

impl OracleState {
    pub fn new(pool: PoolId, tick: i32, max_move_per_update: u32, timestamp: u64) -> Self {
        let mut observations = ObservationPages::default();
        observations.reserve(1);
        observations.set(
            0,
            Observation {
                timestamp,
                tick,
                tick_cumulative: 0,
            },
        );

        Self {
            pool,
            observations,
            index: 0,
            cardinality: 1,
            cardinality_next: 1,
            max_move_per_update,
            truncation_budget: 0,
            last_budget_update_timestamp: timestamp,
            last_tune_timestamp: timestamp,
            last_tune_slot: None,
            auto_tune_paused: false,
            last_policy_refresh_slot: None,
        }
    }

    pub fn latest(&self) -> Observation {
        self.observations.at(self.index)
    }

    pub fn oldest(&self) -> Observation {
        self.observations.at(self.oldest_index())
    }

    fn oldest_index(&self) -> u32 {
        (self.index + 1) % self.cardinality
    }

    // position 0 is the oldest observation, cardinality - 1 the latest
    fn at_position(&self, position: u32) -> Observation {
        self.observations
            .at((self.oldest_index() + position) % self.cardinality)
    }

    /// Clamps the move from the latest recorded tick to `max_move_per_update`.
    pub fn truncate(&self, incoming_tick: i32) -> TruncatedTick {
        let last_tick = self.latest().tick;
        let delta = i64::from(incoming_tick) - i64::from(last_tick);
        let cap = i64::from(self.max_move_per_update);

        if delta.abs() > cap {
            // the clamped tick lies between last_tick and incoming_tick, so it fits in i32
            let tick = (i64::from(last_tick) + delta.signum() * cap) as i32;
            TruncatedTick {
                tick,
                truncated: true,
            }
        } else {
            TruncatedTick {
                tick: incoming_tick,
                truncated: false,
            }
        }
    }

    /// Builds the observation that `write` would append at `timestamp`.
    /// Returns `None` when an observation already exists for that instant.
    pub fn next_observation(&self, timestamp: u64, tick: i32) -> Result<Option<Observation>> {
        let last = self.latest();
        if timestamp < last.timestamp {
            return Err(ErrorCode::InvalidTimestamp);
        }
        if timestamp == last.timestamp {
            return Ok(None);
        }

        let elapsed = i64::try_from(timestamp - last.timestamp)?;
        let tick_cumulative = i64::from(last.tick)
            .checked_mul(elapsed)
            .and_then(|delta| last.tick_cumulative.checked_add(delta))
            .ok_or(ErrorCode::ArithmeticOverflow)?;

        Ok(Some(Observation {
            timestamp,
            tick,
            tick_cumulative,
        }))
    }

    /// Appends an observation, growing the ring by one slot when the cursor
    /// sits at the end of the written region and `cardinality_next` allows it.
    pub fn write(&mut self, observation: Observation) {
        if self.cardinality_next > self.cardinality && self.index == self.cardinality - 1 {
            self.index = self.cardinality;
            self.cardinality += 1;
        } else {
            self.index = (self.index + 1) % self.cardinality;
        }
        self.observations.set(self.index, observation);
    }

    /// Raises `cardinality_next`, allocating pages as needed. Never shrinks.
    pub fn grow(&mut self, cardinality_next: u32) -> Result<u32> {
        if cardinality_next > MAX_CARDINALITY {
            return Err(ErrorCode::InvalidCardinality);
        }
        if cardinality_next <= self.cardinality_next {
            return Ok(self.cardinality_next);
        }
        self.observations.reserve(cardinality_next);
        self.cardinality_next = cardinality_next;
        Ok(cardinality_next)
    }

    /// Decays the budget for the time passed since its last update.
    pub fn decay_truncation_budget(&mut self, timestamp: u64, decay_window_seconds: u64) {
        let elapsed = timestamp.saturating_sub(self.last_budget_update_timestamp);
        if elapsed == 0 {
            return;
        }
        self.truncation_budget = linear_decay(self.truncation_budget, elapsed, decay_window_seconds);
        self.last_budget_update_timestamp = timestamp;
    }

    pub fn record_truncation(&mut self) {
        self.truncation_budget = self.truncation_budget.saturating_add(TRUNCATION_BUDGET_UNIT);
    }

    /// Steps the cap toward the target truncation frequency.
    ///
    /// Runs at most once per `auto_tune_interval_seconds` and once per slot.
    /// Truncating more often than targeted loosens the cap, less often
    /// tightens it. Returns the adjustment when the cap changed.
    pub fn auto_tune(&mut self, policy: &PoolPolicy, clock: &Clock) -> Option<CapAdjustment> {
        if self.auto_tune_paused || self.last_tune_slot == Some(clock.slot) {
            return None;
        }
        let since_last_tune = clock.unix_timestamp.saturating_sub(self.last_tune_timestamp);
        if since_last_tune < policy.auto_tune_interval_seconds {
            return None;
        }

        self.last_tune_timestamp = clock.unix_timestamp;
        self.last_tune_slot = Some(clock.slot);

        let old_cap = self.max_move_per_update;
        let step = if policy.step_ppm == 0 {
            0
        } else {
            apply_ppm(u64::from(old_cap), policy.step_ppm).max(1) as u32
        };

        let target = policy.truncation_budget_target_ppm;
        let new_cap = if self.truncation_budget > target {
            old_cap.saturating_add(step)
        } else if self.truncation_budget < target {
            old_cap.saturating_sub(step)
        } else {
            old_cap
        };
        let new_cap = policy.clamp_cap(new_cap);

        if new_cap == old_cap {
            return None;
        }
        self.max_move_per_update = new_cap;
        Some(CapAdjustment { old_cap, new_cap })
    }

    /// Cumulative tick at `seconds_ago` before `now`.
    pub fn observe_single(&self, now: u64, seconds_ago: u64) -> Result<i64> {
        let target = now
            .checked_sub(seconds_ago)
            .ok_or(ErrorCode::InsufficientHistory)?;

        let latest = self.latest();
        if target >= latest.timestamp {
            let elapsed = i64::try_from(target - latest.timestamp)?;
            return i64::from(latest.tick)
                .checked_mul(elapsed)
                .and_then(|delta| latest.tick_cumulative.checked_add(delta))
                .ok_or(ErrorCode::ArithmeticOverflow);
        }

        let oldest = self.oldest();
        if target < oldest.timestamp {
            return Err(ErrorCode::InsufficientHistory);
        }

        let (before_or_at, at_or_after) = self.bracket(target);
        if before_or_at.timestamp == target {
            return Ok(before_or_at.tick_cumulative);
        }
        if at_or_after.timestamp == target {
            return Ok(at_or_after.tick_cumulative);
        }

        let span = i128::from(at_or_after.timestamp - before_or_at.timestamp);
        let offset = i128::from(target - before_or_at.timestamp);
        let delta = i128::from(at_or_after.tick_cumulative) - i128::from(before_or_at.tick_cumulative);
        let interpolated = i128::from(before_or_at.tick_cumulative) + delta * offset / span;
        Ok(i64::try_from(interpolated)?)
    }

    // Binary search over the ring, from the oldest to the latest observation.
    // Requires oldest.timestamp <= target < latest.timestamp.
    fn bracket(&self, target: u64) -> (Observation, Observation) {
        let mut lower = 0u32;
        let mut upper = self.cardinality - 1;

        // invariant: at_position(lower) <= target < at_position(upper)
        while upper - lower > 1 {
            let mid = lower + (upper - lower) / 2;
            if self.at_position(mid).timestamp <= target {
                lower = mid;
            } else {
                upper = mid;
            }
        }

        (self.at_position(lower), self.at_position(upper))
    }
}

#[cfg(test)]
mod oracle_state_tests {
    use super::*;
    use crate::constants::PAGE_SIZE;

    fn pool() -> PoolId {
        PoolId::new([7; 32])
    }

    #[test]
    fn test_new() {
        let state = OracleState::new(pool(), 100, 50, 1_000);
        assert_eq!(state.cardinality, 1);
        assert_eq!(state.cardinality_next, 1);
        assert_eq!(state.index, 0);
        assert_eq!(
            state.latest(),
            Observation {
                timestamp: 1_000,
                tick: 100,
                tick_cumulative: 0
            }
        );
        assert_eq!(state.oldest(), state.latest());
    }

    #[test]
    fn test_truncate() {
        let state = OracleState::new(pool(), 100, 50, 1_000);

        assert_eq!(
            state.truncate(300),
            TruncatedTick {
                tick: 150,
                truncated: true
            }
        );
        assert_eq!(
            state.truncate(-100),
            TruncatedTick {
                tick: 50,
                truncated: true
            }
        );
        // exactly at the cap is not truncated
        assert_eq!(
            state.truncate(150),
            TruncatedTick {
                tick: 150,
                truncated: false
            }
        );
        assert_eq!(
            state.truncate(60),
            TruncatedTick {
                tick: 60,
                truncated: false
            }
        );
    }

    #[test]
    fn test_next_observation() {
        let state = OracleState::new(pool(), 10, 50, 1_000);

        assert_eq!(state.next_observation(1_000, 20), Ok(None));
        assert_eq!(state.next_observation(999, 20), Err(ErrorCode::InvalidTimestamp));
        assert_eq!(
            state.next_observation(1_012, 20),
            Ok(Some(Observation {
                timestamp: 1_012,
                tick: 20,
                tick_cumulative: 120
            }))
        );
    }

    #[test]
    fn test_write_wraps_without_growth() {
        let mut state = OracleState::new(pool(), 0, 50, 0);
        for t in 1..=3u64 {
            let observation = state.next_observation(t, t as i32).unwrap().unwrap();
            state.write(observation);
            // single slot ring: always overwritten in place
            assert_eq!(state.index, 0);
            assert_eq!(state.cardinality, 1);
            assert_eq!(state.latest().timestamp, t);
        }
    }

    #[test]
    fn test_write_grows_by_one() {
        let mut state = OracleState::new(pool(), 0, 50, 0);
        state.grow(3).unwrap();

        for t in 1..=2u64 {
            let observation = state.next_observation(t, 0).unwrap().unwrap();
            state.write(observation);
            assert_eq!(state.cardinality, t as u32 + 1);
            assert_eq!(state.index, t as u32);
        }

        // full: wraps to the oldest slot
        let observation = state.next_observation(3, 0).unwrap().unwrap();
        state.write(observation);
        assert_eq!(state.cardinality, 3);
        assert_eq!(state.index, 0);
        assert_eq!(state.oldest().timestamp, 1);
    }

    #[test]
    fn test_grow() {
        let mut state = OracleState::new(pool(), 0, 50, 0);
        assert_eq!(state.grow(10), Ok(10));
        assert_eq!(state.grow(5), Ok(10));
        assert_eq!(state.observations.page_count(), 1);

        assert_eq!(state.grow(PAGE_SIZE as u32 + 1), Ok(PAGE_SIZE as u32 + 1));
        assert_eq!(state.observations.page_count(), 2);

        assert_eq!(state.grow(MAX_CARDINALITY + 1), Err(ErrorCode::InvalidCardinality));
        assert_eq!(state.cardinality_next, PAGE_SIZE as u32 + 1);
    }

    #[test]
    fn test_truncation_budget() {
        let mut state = OracleState::new(pool(), 0, 50, 0);
        state.record_truncation();
        state.record_truncation();
        assert_eq!(state.truncation_budget, 2 * TRUNCATION_BUDGET_UNIT);

        // same instant: no decay
        state.decay_truncation_budget(0, 100);
        assert_eq!(state.truncation_budget, 2 * TRUNCATION_BUDGET_UNIT);

        state.decay_truncation_budget(25, 100);
        assert_eq!(state.truncation_budget, 1_500_000);
        assert_eq!(state.last_budget_update_timestamp, 25);

        state.decay_truncation_budget(125, 100);
        assert_eq!(state.truncation_budget, 0);
    }

    #[test]
    fn test_auto_tune_rate_limit() {
        let policy = PoolPolicy {
            min_cap: 10,
            max_cap: 1_000,
            step_ppm: 100_000,
            truncation_budget_target_ppm: 1_000_000,
            auto_tune_interval_seconds: 60,
            ..Default::default()
        };
        let mut state = OracleState::new(pool(), 0, 100, 0);

        // interval not elapsed
        assert_eq!(state.auto_tune(&policy, &Clock::new(59, 1)), None);
        assert_eq!(state.last_tune_slot, None);

        // under target: tighten
        assert_eq!(
            state.auto_tune(&policy, &Clock::new(60, 2)),
            Some(CapAdjustment {
                old_cap: 100,
                new_cap: 90
            })
        );
        assert_eq!(state.last_tune_slot, Some(2));

        // same slot, even if the interval elapsed
        state.last_tune_timestamp = 0;
        assert_eq!(state.auto_tune(&policy, &Clock::new(200, 2)), None);

        // over target: loosen
        state.truncation_budget = 3 * TRUNCATION_BUDGET_UNIT;
        assert_eq!(
            state.auto_tune(&policy, &Clock::new(200, 3)),
            Some(CapAdjustment {
                old_cap: 90,
                new_cap: 99
            })
        );

        // on target: no change, window still consumed
        state.truncation_budget = TRUNCATION_BUDGET_UNIT;
        assert_eq!(state.auto_tune(&policy, &Clock::new(300, 4)), None);
        assert_eq!(state.last_tune_timestamp, 300);
    }

    #[test]
    fn test_auto_tune_bounds_and_pause() {
        let policy = PoolPolicy {
            min_cap: 10,
            max_cap: 12,
            step_ppm: 10_000,
            truncation_budget_target_ppm: 1_000_000,
            auto_tune_interval_seconds: 1,
            ..Default::default()
        };
        let mut state = OracleState::new(pool(), 0, 11, 0);

        // step rounds to at least one tick
        state.truncation_budget = 5 * TRUNCATION_BUDGET_UNIT;
        assert_eq!(state.auto_tune(&policy, &Clock::new(1, 1)).unwrap().new_cap, 12);
        // capped at max_cap
        assert_eq!(state.auto_tune(&policy, &Clock::new(2, 2)), None);
        assert_eq!(state.max_move_per_update, 12);

        state.truncation_budget = 0;
        state.auto_tune(&policy, &Clock::new(3, 3));
        state.auto_tune(&policy, &Clock::new(4, 4));
        state.auto_tune(&policy, &Clock::new(5, 5));
        // floored at min_cap
        assert_eq!(state.max_move_per_update, 10);

        state.auto_tune_paused = true;
        state.truncation_budget = 5 * TRUNCATION_BUDGET_UNIT;
        assert_eq!(state.auto_tune(&policy, &Clock::new(10, 10)), None);
        assert_eq!(state.max_move_per_update, 10);
    }

    #[test]
    fn test_observe_single() {
        let mut state = OracleState::new(pool(), 10, 1_000, 100);
        state.grow(4).unwrap();
        // (timestamp, tick): (100, 10) -> (110, 20) -> (130, -10)
        for (timestamp, tick) in [(110u64, 20), (130, -10)] {
            let observation = state.next_observation(timestamp, tick).unwrap().unwrap();
            state.write(observation);
        }
        assert_eq!(state.latest().tick_cumulative, 10 * 10 + 20 * 20);

        let now = 140;
        // extrapolated from the latest observation
        assert_eq!(state.observe_single(now, 0), Ok(500 - 10 * 10));
        // exactly on observations
        assert_eq!(state.observe_single(now, 10), Ok(500));
        assert_eq!(state.observe_single(now, 30), Ok(100));
        assert_eq!(state.observe_single(now, 40), Ok(0));
        // interpolated
        assert_eq!(state.observe_single(now, 35), Ok(50));
        assert_eq!(state.observe_single(now, 20), Ok(100 + 20 * 10));
        // too old
        assert_eq!(state.observe_single(now, 41), Err(ErrorCode::InsufficientHistory));
        assert_eq!(state.observe_single(now, 141), Err(ErrorCode::InsufficientHistory));
    }
}
