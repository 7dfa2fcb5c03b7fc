//! Shared test utilities for flipdeck integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod builders;

pub use builders::*;
