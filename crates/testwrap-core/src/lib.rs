//! testwrap core: pure planning primitives, error types, and policy data.
//!
//! This crate decides *what* a test run looks like (packages, flags, mode),
//! merges coverage profiles, and models the shipped permission policy. It
//! carries no process or runtime dependencies so the runner and tests can
//! exercise it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are lint-denied here. All fallible paths
//! surface as `TestwrapError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod coverage;
pub mod error;
pub mod plan;
pub mod policy;
pub mod summary;

/// Shared result type.
pub use error::{ErrorCode, Result, TestwrapError};
