//! Bit quality testing
//!
//! Statistical checks that the oracle's measurements stay balanced and
//! unpatterned.


pub use tests::{run_all_tests, BitTestResults};
