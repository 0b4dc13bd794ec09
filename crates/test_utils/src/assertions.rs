//! Custom Test Assertions
//!
//! Assertion helpers for gateway errors that print the full error on
//! mismatch.

use std::fmt::Debug;

use core_kernel::{CadError, ResponseCode};

/// Asserts that `result` failed with the given response code
///
/// # Panics
///
/// Panics if the result is `Ok` or carries a different code
pub fn assert_cad_code<T: Debug>(result: &Result<T, CadError>, expected: ResponseCode) {
    match result {
        Ok(value) => panic!("Expected error {}, got Ok({:?})", expected, value),
        Err(error) => assert_eq!(
            error.code(),
            expected,
            "Expected error {}, got {}",
            expected,
            error
        ),
    }
}
