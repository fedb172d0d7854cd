mod clock;
mod key;
mod pool;

pub use clock::*;
pub use key::*;
pub use pool::*;
