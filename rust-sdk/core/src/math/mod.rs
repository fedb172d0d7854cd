mod decay;
mod int_division;
mod ppm;

pub use decay::*;
pub use int_division::*;
pub use ppm::*;
