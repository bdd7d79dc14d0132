// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Functional tests for the TokenReview webhook core.
//!
//! These tests exercise the public library surface (schema validation,
//! response builder, health/metrics state) as black-box contracts,
//! without binding any sockets.
//!
//! ```bash
//! # Run all functional tests
//! cargo test --test functional
//!
//! # Run with verbose output
//! cargo test --test functional -- --nocapture
//! ```

mod builder_tests;
mod schema_tests;
