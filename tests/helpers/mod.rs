//! Test helpers module
//!
//! This module provides utilities and helpers for testing the CS Rippers
//! backend. It includes a mock mail provider and test data builders.

pub mod mail_mock;
pub mod test_data;

pub use mail_mock::*;
pub use test_data::*;
