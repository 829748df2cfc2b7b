//! Tests for the executor
//!
//! Organized by feature area

mod helpers;

mod error_tests;
mod record_tests;
mod stdlib_tests;
