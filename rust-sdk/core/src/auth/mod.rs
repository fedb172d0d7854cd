pub mod access_control;

pub use access_control::*;
