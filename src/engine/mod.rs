//! Execution engine for roadie
//!
//! The engine is two halves:
//! 1. Planning - build the ordered step list from config
//! 2. Executing - run each step in sequence, halting on required failures

pub mod executor;
pub mod planner;

pub use executor::{ExecuteOptions, execute};
