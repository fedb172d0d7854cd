/// Denominator of every ppm ratio.
pub const PPM_DENOMINATOR: u32 = 1_000_000;

/// Largest fee a pool can be charged, represented in ppm (100%).
/// `baseline + surge` is clamped to this value before it is returned.
pub const FEE_PPM_HARD_LIMIT: u32 = 1_000_000;

/// Fee field value marking a pool whose LP fee is supplied dynamically.
pub const DYNAMIC_FEE_FLAG: u32 = 0x80_0000;
