//! repo-warden CLI library exports for integration testing.
//!
//! This module exposes the driver bootstrap and command implementations for
//! use in integration tests.

pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod errors;
