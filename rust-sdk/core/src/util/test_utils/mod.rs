pub mod hook_test_fixture;

pub use hook_test_fixture::*;
