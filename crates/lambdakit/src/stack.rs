//! Deployment units: environment-aware resource groups with uniform tags.

use lambdakit_core::{ConfigRecord, ContextStore, TagSet, resolve_environment};

use crate::function::Function;

/// Context key whose value names the active deployment environment.
pub const ENVIRONMENT_CONFIG_KEY: &str = "config";

/// A logical group of resources deployed and tagged together.
///
/// Construction resolves the environment record through the two-hop
/// context lookup and applies two tags drawn from it — `application` from
/// the record's `project` field and `environment` from its `environment`
/// field. The hosting toolchain propagates unit tags to every taggable
/// resource nested under the unit.
#[derive(Debug)]
pub struct DeploymentUnit {
    name: String,
    config: ConfigRecord,
    tags: TagSet,
    functions: Vec<Function>,
}

impl DeploymentUnit {
    /// Construct a unit using the default lookup key
    /// ([`ENVIRONMENT_CONFIG_KEY`]).
    ///
    /// # Errors
    ///
    /// Fails when either lookup hop misses
    /// ([`Error::ConfigurationMissing`](lambdakit_core::Error::ConfigurationMissing))
    /// or the record lacks `project` or `environment`
    /// ([`Error::RecordFieldMissing`](lambdakit_core::Error::RecordFieldMissing)).
    /// An unresolvable unit is never constructed with undefined tag values.
    pub fn new(name: impl Into<String>, context: &impl ContextStore) -> lambdakit_core::Result<Self> {
        Self::with_config_key(name, context, ENVIRONMENT_CONFIG_KEY)
    }

    /// Construct a unit resolving the environment through `lookup_key`.
    pub fn with_config_key(
        name: impl Into<String>,
        context: &impl ContextStore,
        lookup_key: &str,
    ) -> lambdakit_core::Result<Self> {
        let name = name.into();
        let config = resolve_environment(context, lookup_key)?;

        let mut tags = TagSet::new();
        tags.add("application", config.require_str("project")?);
        tags.add("environment", config.require_str("environment")?);

        tracing::debug!(
            unit = %name,
            application = config.get_str("project").unwrap_or_default(),
            environment = config.get_str("environment").unwrap_or_default(),
            "deployment unit constructed"
        );

        Ok(Self {
            name,
            config,
            tags,
            functions: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved environment record, verbatim from the context store.
    pub fn config(&self) -> &ConfigRecord {
        &self.config
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Append an additional unit-level tag.
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.add(key, value);
    }

    /// Register a function under this unit.
    pub fn add_function(&mut self, function: Function) -> &Function {
        self.functions.push(function);
        self.functions.last().expect("just pushed")
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }
}
