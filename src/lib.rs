// ABOUTME: Library root for springship - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod output;
pub mod remote;
pub mod task;
pub mod types;
