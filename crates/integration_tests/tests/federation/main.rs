mod join;
mod reconstruct;
mod send_share;
mod status;

pub use edgefed_integration_tests as test_utils;
