//! Registered test suites

pub mod regression;

use crate::runner::TestCase;

/// Every test the harness knows about
pub fn all() -> Vec<TestCase> {
    regression::cases()
}
