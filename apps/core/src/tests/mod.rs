//! Test Module
//!
//! Broader suites for the NEXUS core.
//!
//! ## Test Categories
//! - `brain_tests`: pattern library, intent classification, requirement analysis
//! - `mode_tests`: file-backed Mode State persistence and recovery
//! - `dispatcher_tests`: routing, failure containment, mode behavior across turns
//! - `session_tests`: sequential processing and per-session isolation

pub mod mode_tests;
pub mod session_tests;
