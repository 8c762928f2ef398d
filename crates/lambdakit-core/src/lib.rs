//! Core types and configuration for lambdakit.
//!
//! This crate defines the deployment context store and two-hop environment
//! resolution ([`resolve_environment`]), the unit-scoped tag registry
//! ([`TagSet`]), the `lambdakit.toml` defaults schema ([`KitConfig`]), and
//! shared error types.

pub mod config;
pub mod context;
pub mod error;
pub mod tags;

pub use config::{FunctionDefaults, KitConfig};
pub use context::{ConfigRecord, ContextStore, JsonContext, resolve_environment};
pub use error::{Error, Result};
pub use tags::TagSet;
