//! Test module organization.
//!
//! This module organizes all integration tests for the synchronous storage
//! library.



/// End-to-end driver model tests.
mod integration_tests;


/// Compound assignment and comparison operator tests.
mod operator_tests;
