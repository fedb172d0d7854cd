use super::mul_div_floor;

/// Linear decay of `value` over `window` seconds, evaluated after `elapsed` seconds.
///
/// Returns `value * (window - elapsed) / window`, rounded down, and exactly 0
/// once `elapsed >= window`. A zero window decays immediately.
pub fn linear_decay(value: u64, elapsed: u64, window: u64) -> u64 {
    if window == 0 || elapsed >= window {
        return 0;
    }
    // (window - elapsed) < window, so the quotient is below value and fits in u64
    mul_div_floor(value, window - elapsed, window).unwrap_or(0)
}
