//! Serverless function definitions with null-coalescing defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use lambdakit_build::{InstallPolicy, LocalBundler};
use lambdakit_core::FunctionDefaults;

/// Caller-supplied parameters for one function.
///
/// Optional fields fall back to [`FunctionDefaults`] (or stay unset where
/// the resource constructor treats absence as meaningful). All fields pass
/// through to the external resource constructor unchanged.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub name: String,
    /// Parent directory of per-unit code directories; the unit's own
    /// directory is `{src_path}/{name}`.
    pub src_path: PathBuf,
    pub description: String,
    pub timeout_secs: u64,
    pub memory_mb: Option<u32>,
    pub retry_attempts: Option<u32>,
    pub environment: BTreeMap<String, String>,
    pub runtime: Option<String>,
    pub log_retention_days: Option<u32>,
    pub layers: Vec<String>,
    /// Shared library directory bundled in alongside the unit's own code.
    pub shared_lib: Option<PathBuf>,
    pub reserved_concurrency: Option<u32>,
    pub dead_letter_target: Option<String>,
    pub role: Option<String>,
}

impl FunctionSpec {
    pub fn new(
        name: impl Into<String>,
        src_path: impl Into<PathBuf>,
        description: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            name: name.into(),
            src_path: src_path.into(),
            description: description.into(),
            timeout_secs,
            memory_mb: None,
            retry_attempts: None,
            environment: BTreeMap::new(),
            runtime: None,
            log_retention_days: None,
            layers: Vec::new(),
            shared_lib: None,
            reserved_concurrency: None,
            dead_letter_target: None,
            role: None,
        }
    }
}

/// Fully-resolved function definition, ready for the resource constructor.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub description: String,
    /// Always `{name}.lambda_handler` — the source layout contract puts one
    /// module named after the unit in `src/`, exposing `lambda_handler`.
    pub handler: String,
    pub code_dir: PathBuf,
    pub runtime: String,
    pub timeout_secs: u64,
    pub memory_mb: u32,
    pub retry_attempts: u32,
    pub environment: BTreeMap<String, String>,
    pub log_retention_days: u32,
    pub layers: Vec<String>,
    pub reserved_concurrency: Option<u32>,
    pub dead_letter_target: Option<String>,
    pub role: Option<String>,
    /// Bundling strategy for the asset pipeline's local-bundling hook.
    pub bundling: LocalBundler,
}

/// Builds [`Function`] values from specs plus immutable defaults.
#[derive(Debug, Clone)]
pub struct FunctionFactory {
    defaults: FunctionDefaults,
    install_policy: InstallPolicy,
}

impl FunctionFactory {
    pub fn new(defaults: FunctionDefaults) -> Self {
        Self {
            defaults,
            install_policy: InstallPolicy::default(),
        }
    }

    pub fn with_install_policy(mut self, policy: InstallPolicy) -> Self {
        self.install_policy = policy;
        self
    }

    pub fn defaults(&self) -> &FunctionDefaults {
        &self.defaults
    }

    /// Resolve a spec into a function definition.
    ///
    /// Pure pass-through: unset optional fields take the factory defaults,
    /// everything else is forwarded untouched. The environment map is
    /// merged into a fresh copy, with default entries overriding per-call
    /// entries on key collision.
    pub fn build(&self, spec: FunctionSpec) -> Function {
        let code_dir = spec.src_path.join(&spec.name);
        let handler = format!("{}.lambda_handler", spec.name);

        let mut environment = spec.environment;
        environment.extend(
            self.defaults
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let mut bundling =
            LocalBundler::new(&code_dir).with_policy(self.install_policy.clone());
        if let Some(lib) = spec.shared_lib {
            bundling = bundling.with_shared_lib(lib);
        }

        let runtime = spec
            .runtime
            .unwrap_or_else(|| self.defaults.runtime.clone());

        tracing::debug!(
            name = %spec.name,
            runtime = %runtime,
            code_dir = %code_dir.display(),
            "function definition built"
        );

        Function {
            name: spec.name,
            description: spec.description,
            handler,
            code_dir,
            runtime,
            timeout_secs: spec.timeout_secs,
            memory_mb: spec.memory_mb.unwrap_or(self.defaults.memory_mb),
            retry_attempts: spec.retry_attempts.unwrap_or(self.defaults.retry_attempts),
            environment,
            log_retention_days: spec
                .log_retention_days
                .unwrap_or(self.defaults.log_retention_days),
            layers: spec.layers,
            reserved_concurrency: spec.reserved_concurrency,
            dead_letter_target: spec.dead_letter_target,
            role: spec.role,
            bundling,
        }
    }
}
