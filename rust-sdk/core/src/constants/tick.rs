/// The minimum tick index a pool can report.
pub const MIN_TICK: i32 = -887272;

/// The maximum tick index a pool can report.
pub const MAX_TICK: i32 = 887272;

/// Tick spacings accepted when no policy file overrides them.
pub const DEFAULT_SUPPORTED_TICK_SPACINGS: [u16; 3] = [10, 60, 200];
