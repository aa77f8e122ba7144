//! Shared configuration, error, and identifier types for the curtain scheduling engine.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;
