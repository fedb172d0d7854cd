pub mod fee;
pub mod observation;
pub mod oracle;

pub use self::fee::*;
pub use self::observation::*;
pub use self::oracle::*;
