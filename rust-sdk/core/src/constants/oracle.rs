/// Number of observation slots held by one page of the ring buffer.
pub const PAGE_SIZE: usize = 512;

/// Upper bound for the number of observations a single pool can retain.
/// Pages are allocated lazily, so this only bounds `cardinality_next`.
pub const MAX_CARDINALITY: u32 = 65_535;

/// One truncation adds this amount to the truncation budget,
/// so the budget reads as "truncation events scaled by 1e6".
pub const TRUNCATION_BUDGET_UNIT: u64 = 1_000_000;
