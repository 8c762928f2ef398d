//! Deployment units and serverless function definitions for lambdakit.
//!
//! # Construction pipeline
//!
//! ```text
//! DeploymentUnit::new(name, context)
//!   1. Resolve  ── context["config"] → env name → environment record
//!   2. Tag      ── application = record["project"],
//!                  environment = record["environment"]
//!
//! FunctionFactory::build(spec)
//!   3. Defaults ── null-coalesce against lambdakit.toml [function]
//!   4. Bundling ── LocalBundler for {src_path}/{name}, handed to the
//!                  asset pipeline's local-bundling hook
//! ```
//!
//! # Source layout contract (per unit)
//!
//! ```text
//! {src_path}/{name}/
//!   requirements.txt        dependency manifest
//!   src/{name}.py           module exposing lambda_handler(event, context)
//! ```

pub mod function;
pub mod stack;

pub use function::{Function, FunctionFactory, FunctionSpec};
pub use stack::{DeploymentUnit, ENVIRONMENT_CONFIG_KEY};

pub use lambdakit_build::{
    BundleError, BundleRequest, InstallError, InstallPolicy, LocalBundler, PipExecutor, RealPip,
};
pub use lambdakit_core::{
    ConfigRecord, ContextStore, Error, FunctionDefaults, JsonContext, KitConfig, Result, TagSet,
    resolve_environment,
};
