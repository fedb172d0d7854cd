/// Caller-supplied notion of "now".
///
/// The engine never reads a wall clock. Every mutating call receives the
/// timestamp and slot of the step it runs in, which keeps replays
/// deterministic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Clock {
    pub unix_timestamp: u64,
    /// Block-equivalent unit used by the per-slot rate limits.
    pub slot: u64,
}

impl Clock {
    pub fn new(unix_timestamp: u64, slot: u64) -> Self {
        Self {
            unix_timestamp,
            slot,
        }
    }
}
