use crate::constants::FEE_PPM_HARD_LIMIT;
use crate::math::{apply_ppm, linear_decay};
use crate::policy::PoolPolicy;

/// Per-pool fee state: a slowly moving baseline plus a surge that is set
/// on CAP entry and decays linearly once the CAP event ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct FeeState {
    pub baseline_fee_ppm: u32,
    pub surge_fee_ppm: u32,
    pub in_cap_event: bool,
    pub cap_event_entered_at: Option<u64>,
    pub cap_event_ended_at: Option<u64>,
    pub last_baseline_update_at: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CapTransition {
    Entered,
    Exited,
}

impl FeeState {
    pub fn new(baseline_fee_ppm: u32, timestamp: u64) -> Self {
        Self {
            baseline_fee_ppm,
            last_baseline_update_at: timestamp,
            ..Default::default()
        }
    }

    pub fn decayed_surge(&self, now: u64, decay_period_seconds: u64) -> u32 {
        if self.in_cap_event {
            return self.surge_fee_ppm;
        }
        match self.cap_event_ended_at {
            None => 0,
            Some(ended_at) => {
                let elapsed = now.saturating_sub(ended_at);
                linear_decay(u64::from(self.surge_fee_ppm), elapsed, decay_period_seconds) as u32
            }
        }
    }

    pub fn total_fee(&self, now: u64, decay_period_seconds: u64) -> u32 {
        let total = u64::from(self.baseline_fee_ppm)
            + u64::from(self.decayed_surge(now, decay_period_seconds));
        total.min(u64::from(FEE_PPM_HARD_LIMIT)) as u32
    }

    /// Applies one truncation signal. Returns the CAP transition it caused, if any.
    pub fn on_truncation_status(
        &mut self,
        truncated: bool,
        now: u64,
        initial_surge_fee_ppm: u32,
    ) -> Option<CapTransition> {
        match (truncated, self.in_cap_event) {
            (true, false) => {
                self.in_cap_event = true;
                self.surge_fee_ppm = initial_surge_fee_ppm;
                self.cap_event_entered_at = Some(now);
                self.cap_event_ended_at = None;
                Some(CapTransition::Entered)
            }
            (false, true) => {
                self.in_cap_event = false;
                self.cap_event_ended_at = Some(now);
                Some(CapTransition::Exited)
            }
            _ => None,
        }
    }

    /// Baseline the next update would set for the given movement cap.
    ///
    /// The move toward `cap * base_fee_factor_ppm` is limited to
    /// `base_fee_step_ppm` of the current baseline, then the result is
    /// kept within `[min_base_fee_ppm, max_base_fee_ppm]`.
    pub fn next_baseline(&self, max_move_per_update: u32, policy: &PoolPolicy) -> u32 {
        let old = u64::from(self.baseline_fee_ppm);
        let candidate = u64::from(max_move_per_update) * u64::from(policy.base_fee_factor_ppm);
        let max_step = apply_ppm(old, policy.base_fee_step_ppm);

        let stepped = if candidate > old {
            candidate.min(old.saturating_add(max_step))
        } else {
            candidate.max(old.saturating_sub(max_step))
        };

        stepped.clamp(
            u64::from(policy.min_base_fee_ppm),
            u64::from(policy.max_base_fee_ppm),
        ) as u32
    }
}
