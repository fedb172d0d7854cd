use crate::auth::AccessControl;
use crate::constants::DYNAMIC_FEE_FLAG;
use crate::manager::{SwapLifecycle, TruncatedOracle};
use crate::policy::{PolicyRegistry, PolicyStore, PoolPolicy};
use crate::types::{CallerId, Clock, PoolId, PoolSnapshot};

pub const TS_60: u16 = 60;

pub fn swap_controller() -> CallerId {
    CallerId::new([1; 32])
}

pub fn governance() -> CallerId {
    CallerId::new([2; 32])
}

pub fn outsider() -> CallerId {
    CallerId::new([3; 32])
}

pub fn access_control() -> AccessControl {
    AccessControl::new(swap_controller(), governance())
}

pub fn pool_id() -> PoolId {
    PoolId::new([0xaa; 32])
}

pub fn snapshot(tick_current_index: i32) -> PoolSnapshot {
    PoolSnapshot {
        pool: pool_id(),
        tick_spacing: TS_60,
        fee: DYNAMIC_FEE_FLAG,
        tick_current_index,
    }
}

/// Registry whose default policy bounds the cap to `[10, 1000]`.
pub fn test_registry() -> PolicyRegistry {
    PolicyRegistry::new(PoolPolicy {
        min_cap: 10,
        max_cap: 1_000,
        ..Default::default()
    })
}

/// Enables `pool_id()` at t = 0.
pub fn enabled_oracle_into(
    oracle: &mut TruncatedOracle,
    policies: &impl PolicyStore,
    tick: i32,
    initial_cap: u32,
) {
    oracle
        .enable(&swap_controller(), &snapshot(tick), initial_cap, &Clock::new(0, 0), policies)
        .unwrap();
}

/// A pool wired through the full swap lifecycle, driven hour by hour.
pub struct HookTestFixture {
    pub lifecycle: SwapLifecycle<PolicyRegistry>,
    pub clock: Clock,
}

pub struct HookTestFixtureInfo {
    pub policy: PoolPolicy,
    pub tick: i32,
    pub initial_cap: u32,
    pub cardinality_next: u32,
}

impl Default for HookTestFixtureInfo {
    fn default() -> Self {
        HookTestFixtureInfo {
            policy: PoolPolicy {
                min_cap: 10,
                max_cap: 1_000,
                ..Default::default()
            },
            tick: 0,
            initial_cap: 50,
            cardinality_next: 1,
        }
    }
}

impl HookTestFixture {
    pub fn new(info: HookTestFixtureInfo) -> Self {
        let clock = Clock::new(0, 0);
        let mut lifecycle = SwapLifecycle::new(access_control(), PolicyRegistry::new(info.policy));
        lifecycle
            .after_initialize(&swap_controller(), &snapshot(info.tick), info.initial_cap, &clock)
            .unwrap();
        if info.cardinality_next > 1 {
            lifecycle
                .increase_cardinality_next(&swap_controller(), &pool_id(), info.cardinality_next)
                .unwrap();
        }
        HookTestFixture { lifecycle, clock }
    }

    pub fn advance(&mut self, seconds: u64) {
        self.clock = Clock::new(self.clock.unix_timestamp + seconds, self.clock.slot + 1);
    }

    /// Runs one swap ending at `tick` and returns whether it was truncated.
    pub fn swap_to(&mut self, tick: i32) -> bool {
        self.lifecycle
            .before_swap(&swap_controller(), &pool_id(), self.clock.unix_timestamp)
            .unwrap();
        let outcome = self
            .lifecycle
            .after_swap(&swap_controller(), &pool_id(), tick, &self.clock)
            .unwrap();
        assert_eq!(outcome.fee_notification_error, None);
        assert_eq!(outcome.baseline_update_error, None);
        outcome.truncated
    }

    pub fn current_tick(&self) -> i32 {
        self.lifecycle
            .oracle()
            .latest_observation(&pool_id())
            .unwrap()
            .tick
    }

    pub fn max_move_per_update(&self) -> u32 {
        self.lifecycle.oracle().max_move_per_update(&pool_id()).unwrap()
    }

    pub fn fee_state(&self) -> (u32, u32) {
        self.lifecycle
            .fees()
            .get_fee_state(&pool_id(), self.clock.unix_timestamp, self.lifecycle.policies())
    }
}
