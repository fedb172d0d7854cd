use std::fmt::Debug;

use crate::types::{CallerId, PoolId};

pub const EVENT_TARGET: &str = "spot_hook::events";

pub trait Event: Debug {
    const NAME: &'static str;

    fn emit(&self) {
        tracing::info!(target: EVENT_TARGET, event = Self::NAME, payload = ?self);
    }
}

macro_rules! event {
    ($(#[$meta:meta])* $name:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: $ty),*
        }

        impl Event for $name {
            const NAME: &'static str = stringify!($name);
        }
    };
}

event!(OracleEnabled {
    pool: PoolId,
    tick: i32,
    max_move_per_update: u32,
});

event!(ObservationCardinalityIncreased {
    pool: PoolId,
    cardinality_next_old: u32,
    cardinality_next_new: u32,
});

event!(
    /// Cap re-tuned by the auto-tuner or re-clamped by a policy refresh.
    MaxMoveUpdated {
        pool: PoolId,
        old_cap: u32,
        new_cap: u32,
        truncation_budget: u64,
    }
);

event!(AutoTunePaused {
    pool: PoolId,
    paused: bool,
});

event!(CapPolicyRefreshed {
    pool: PoolId,
    slot: u64,
    max_move_per_update: u32,
});

event!(SwapControllerRotated {
    old_swap_controller: CallerId,
    new_swap_controller: CallerId,
});

event!(FeeStateInitialized {
    pool: PoolId,
    baseline_fee_ppm: u32,
});

event!(CapEventStarted {
    pool: PoolId,
    timestamp: u64,
    surge_fee_ppm: u32,
});

event!(CapEventEnded {
    pool: PoolId,
    timestamp: u64,
});

event!(BaselineFeeUpdated {
    pool: PoolId,
    old_baseline_fee_ppm: u32,
    new_baseline_fee_ppm: u32,
    max_move_per_update: u32,
});
