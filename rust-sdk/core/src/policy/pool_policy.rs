use serde::Deserialize;

use crate::constants::{FEE_PPM_HARD_LIMIT, PPM_DENOMINATOR};
use crate::errors::{ErrorCode, Result};

/// Tunable parameters of one pool. Read-only for the oracle and the fee engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PoolPolicy {
    /// Lower bound of `max_move_per_update` (ticks).
    #[serde(default = "d_min_cap")]
    pub min_cap: u32,
    /// Upper bound of `max_move_per_update` (ticks).
    #[serde(default = "d_max_cap")]
    pub max_cap: u32,
    /// Relative cap change applied by one auto-tune step.
    #[serde(default = "d_step_ppm")]
    pub step_ppm: u32,
    /// Truncations per decay window the auto-tuner aims for, scaled by 1e6.
    #[serde(default = "d_truncation_budget_target_ppm")]
    pub truncation_budget_target_ppm: u64,
    #[serde(default = "d_budget_decay_window_seconds")]
    pub budget_decay_window_seconds: u64,
    #[serde(default = "d_auto_tune_interval_seconds")]
    pub auto_tune_interval_seconds: u64,

    #[serde(default = "d_initial_surge_fee_ppm")]
    pub initial_surge_fee_ppm: u32,
    #[serde(default = "d_surge_decay_period_seconds")]
    pub surge_decay_period_seconds: u64,

    /// Largest relative baseline change per update interval.
    #[serde(default = "d_base_fee_step_ppm")]
    pub base_fee_step_ppm: u32,
    #[serde(default = "d_base_fee_update_interval_seconds")]
    pub base_fee_update_interval_seconds: u64,
    #[serde(default = "d_min_base_fee_ppm")]
    pub min_base_fee_ppm: u32,
    #[serde(default = "d_max_base_fee_ppm")]
    pub max_base_fee_ppm: u32,
    /// Fee of a pool whose fee state was never initialized, and the
    /// starting baseline of one that was.
    #[serde(default = "d_default_fee_ppm")]
    pub default_fee_ppm: u32,
    /// Baseline fee (ppm) implied by one tick of movement cap.
    #[serde(default = "d_base_fee_factor_ppm")]
    pub base_fee_factor_ppm: u32,
}

fn d_min_cap() -> u32 { 1 }
fn d_max_cap() -> u32 { 1_000 }
fn d_step_ppm() -> u32 { 20_000 }
fn d_truncation_budget_target_ppm() -> u64 { 5_000_000 }
fn d_budget_decay_window_seconds() -> u64 { 86_400 }
fn d_auto_tune_interval_seconds() -> u64 { 3_600 }
fn d_initial_surge_fee_ppm() -> u32 { 10_000 }
fn d_surge_decay_period_seconds() -> u64 { 3_600 }
fn d_base_fee_step_ppm() -> u32 { 20_000 }
fn d_base_fee_update_interval_seconds() -> u64 { 86_400 }
fn d_min_base_fee_ppm() -> u32 { 100 }
fn d_max_base_fee_ppm() -> u32 { 50_000 }
fn d_default_fee_ppm() -> u32 { 3_000 }
fn d_base_fee_factor_ppm() -> u32 { 100 }

impl Default for PoolPolicy {
    fn default() -> Self {
        Self {
            min_cap: d_min_cap(),
            max_cap: d_max_cap(),
            step_ppm: d_step_ppm(),
            truncation_budget_target_ppm: d_truncation_budget_target_ppm(),
            budget_decay_window_seconds: d_budget_decay_window_seconds(),
            auto_tune_interval_seconds: d_auto_tune_interval_seconds(),
            initial_surge_fee_ppm: d_initial_surge_fee_ppm(),
            surge_decay_period_seconds: d_surge_decay_period_seconds(),
            base_fee_step_ppm: d_base_fee_step_ppm(),
            base_fee_update_interval_seconds: d_base_fee_update_interval_seconds(),
            min_base_fee_ppm: d_min_base_fee_ppm(),
            max_base_fee_ppm: d_max_base_fee_ppm(),
            default_fee_ppm: d_default_fee_ppm(),
            base_fee_factor_ppm: d_base_fee_factor_ppm(),
        }
    }
}

impl PoolPolicy {
    /// Rejects configurations the components cannot run with.
    /// Values are never silently clamped into range.
    pub fn validate(&self) -> Result<()> {
        if self.min_cap == 0 {
            return Err(ErrorCode::InvalidPolicy("min_cap must be greater than zero"));
        }
        if self.min_cap > self.max_cap {
            return Err(ErrorCode::InvalidPolicy("min_cap must not exceed max_cap"));
        }
        if self.step_ppm > PPM_DENOMINATOR || self.base_fee_step_ppm > PPM_DENOMINATOR {
            return Err(ErrorCode::InvalidPolicy("step must not exceed 1e6 ppm"));
        }
        if self.budget_decay_window_seconds == 0 {
            return Err(ErrorCode::InvalidPolicy("budget decay window must be greater than zero"));
        }
        if self.surge_decay_period_seconds == 0 {
            return Err(ErrorCode::InvalidPolicy("surge decay period must be greater than zero"));
        }
        if self.min_base_fee_ppm > self.max_base_fee_ppm {
            return Err(ErrorCode::InvalidPolicy("min_base_fee_ppm must not exceed max_base_fee_ppm"));
        }
        if self.max_base_fee_ppm > FEE_PPM_HARD_LIMIT
            || self.default_fee_ppm > FEE_PPM_HARD_LIMIT
            || self.initial_surge_fee_ppm > FEE_PPM_HARD_LIMIT
        {
            return Err(ErrorCode::InvalidPolicy("fee exceeds the hard limit"));
        }
        Ok(())
    }

    pub fn clamp_cap(&self, cap: u32) -> u32 {
        cap.clamp(self.min_cap, self.max_cap)
    }
}
