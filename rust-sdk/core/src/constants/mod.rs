mod fee;
mod oracle;
mod tick;

pub use fee::*;
pub use oracle::*;
pub use tick::*;
