//! Appkit Core Library
//!
//! This crate provides the configuration, error types and invocation models
//! shared by the action sets and the runner.

pub mod config;
pub mod constants;
pub mod error;
pub mod invocation;

// Re-export commonly used types
pub use config::{MirrorTarget, RunnerConfig};
pub use error::{ActionError, ActionResult, ConfigError, LogLevel};
pub use invocation::{ActionParams, InvocationRequest, InvocationResult, Payload};
