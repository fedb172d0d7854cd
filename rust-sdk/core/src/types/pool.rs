use super::PoolId;

/// State of a pool at the moment its oracle is enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub pool: PoolId,
    pub tick_spacing: u16,
    /// Fee field of the pool key. Must carry `DYNAMIC_FEE_FLAG`.
    pub fee: u32,
    pub tick_current_index: i32,
}
