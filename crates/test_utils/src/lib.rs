//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! portfolio test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built identifiers, dates and statements
//! - `builders`: Builder patterns for transactions and whole scenarios
//! - `doubles`: In-memory price sources
//! - `assertions`: Custom assertion helpers for ledgers and summaries
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
