use crate::constants::PPM_DENOMINATOR;
use crate::errors::{ErrorCode, Result};

/// floor(value * numerator / denominator), computed in u128.
pub fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Err(ErrorCode::ArithmeticOverflow);
    }
    let result = u128::from(value) * u128::from(numerator) / u128::from(denominator);
    Ok(u64::try_from(result)?)
}

/// floor(value * ppm / 1e6).
pub fn apply_ppm(value: u64, ppm: u32) -> u64 {
    // ppm <= u32::MAX, so the product always fits in u128 and the
    // quotient is at most value * 4295.
    let result = u128::from(value) * u128::from(ppm) / u128::from(PPM_DENOMINATOR);
    result.min(u128::from(u64::MAX)) as u64
}
