//! Shared test support utilities.
//!
//! This module provides helpers for integration tests: syntax tree fixtures
//! for the versioned-type scenarios, and a small evaluator that runs
//! transformed programs and captures what they print.

#![allow(dead_code)]

pub mod fixtures;
pub mod interp;
