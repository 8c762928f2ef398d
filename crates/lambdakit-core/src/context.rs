//! Deployment context lookup and environment resolution.
//!
//! The deployment toolchain exposes a key-value context resolved at build
//! time, not at runtime. Picking the active environment is a two-hop
//! lookup: one context key names the environment (`"config" → "dev"`), and
//! the environment name keys the full configuration record
//! (`"dev" → { project, environment, ... }`).

use serde_json::Value;
use std::path::Path;

/// External key-value configuration source resolved at deployment build time.
///
/// Implementations must not mutate underlying values on read; resolution
/// performs exactly two `get` calls per deployment unit and caches nothing.
pub trait ContextStore {
    fn get(&self, key: &str) -> Option<&Value>;
}

/// In-memory context, usually loaded from a JSON context file.
#[derive(Debug, Clone, Default)]
pub struct JsonContext {
    entries: serde_json::Map<String, Value>,
}

impl JsonContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load context entries from a JSON file whose top level is an object.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ContextLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| crate::Error::ContextParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        match value {
            Value::Object(entries) => {
                tracing::debug!(path = %path.display(), entries = entries.len(), "context loaded");
                Ok(Self { entries })
            }
            _ => Err(crate::Error::ContextNotObject {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }
}

impl ContextStore for JsonContext {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl FromIterator<(String, Value)> for JsonContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Environment configuration record resolved from the deployment context.
///
/// A read-only string-keyed record. Expected to carry at least `project`
/// and `environment`; [`require_str`](Self::require_str) enforces presence
/// where a field is mandatory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigRecord {
    fields: serde_json::Map<String, Value>,
}

impl ConfigRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field value as a string, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Mandatory string field.
    ///
    /// # Errors
    ///
    /// [`Error::RecordFieldMissing`](crate::Error::RecordFieldMissing) when
    /// the field is absent or not a string.
    pub fn require_str(&self, key: &str) -> crate::Result<&str> {
        self.get_str(key)
            .ok_or_else(|| crate::Error::RecordFieldMissing {
                field: key.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl From<serde_json::Map<String, Value>> for ConfigRecord {
    fn from(fields: serde_json::Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Resolve the active environment record through the two-hop lookup.
///
/// 1. `store.get(lookup_key)` yields the environment name.
/// 2. `store.get(environment_name)` yields the configuration record.
///
/// The record is returned verbatim — resolution never transforms fields.
/// A miss on the first hop fails without attempting the second.
///
/// # Errors
///
/// - [`Error::ConfigurationMissing`](crate::Error::ConfigurationMissing)
///   when either hop has no value
/// - [`Error::ContextValueInvalid`](crate::Error::ContextValueInvalid)
///   when the first hop is not a string or the second is not an object
pub fn resolve_environment(
    store: &impl ContextStore,
    lookup_key: &str,
) -> crate::Result<ConfigRecord> {
    let env_value = store
        .get(lookup_key)
        .ok_or_else(|| crate::Error::ConfigurationMissing {
            key: lookup_key.to_owned(),
        })?;
    let env_name = env_value
        .as_str()
        .ok_or_else(|| crate::Error::ContextValueInvalid {
            key: lookup_key.to_owned(),
            expected: "a string environment name",
        })?;

    let record = store
        .get(env_name)
        .ok_or_else(|| crate::Error::ConfigurationMissing {
            key: env_name.to_owned(),
        })?;
    let fields = record
        .as_object()
        .ok_or_else(|| crate::Error::ContextValueInvalid {
            key: env_name.to_owned(),
            expected: "a configuration object",
        })?;

    tracing::debug!(
        lookup_key,
        environment = env_name,
        fields = fields.len(),
        "deployment environment resolved"
    );

    Ok(ConfigRecord {
        fields: fields.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(entries: &[(&str, Value)]) -> JsonContext {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn resolve_is_identity_on_record() {
        let ctx = store(&[
            ("config", json!("dev")),
            ("dev", json!({"project": "billing", "environment": "dev", "vpc": "vpc-1"})),
        ]);

        let record = resolve_environment(&ctx, "config").unwrap();
        assert_eq!(record.get_str("project"), Some("billing"));
        assert_eq!(record.get_str("environment"), Some("dev"));
        assert_eq!(record.get("vpc"), Some(&json!("vpc-1")));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn first_hop_miss_skips_second() {
        // "dev" exists, but the lookup key itself does not: resolution must
        // fail on the first hop without reaching the record.
        let ctx = store(&[("dev", json!({"project": "p"}))]);

        let err = resolve_environment(&ctx, "config").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::ConfigurationMissing { ref key } if key == "config"
        ));
    }

    #[test]
    fn second_hop_miss_fails() {
        let ctx = store(&[("config", json!("staging"))]);

        let err = resolve_environment(&ctx, "config").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::ConfigurationMissing { ref key } if key == "staging"
        ));
    }

    #[test]
    fn non_string_environment_name_rejected() {
        let ctx = store(&[("config", json!(42))]);

        let err = resolve_environment(&ctx, "config").unwrap_err();
        assert!(matches!(err, crate::Error::ContextValueInvalid { .. }));
    }

    #[test]
    fn non_object_record_rejected() {
        let ctx = store(&[("config", json!("dev")), ("dev", json!("not a record"))]);

        let err = resolve_environment(&ctx, "config").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::ContextValueInvalid { ref key, .. } if key == "dev"
        ));
    }

    // ── Property-based tests ──

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn context_key() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9_-]{0,15}"
        }

        fn record_fields() -> impl Strategy<Value = Vec<(String, String)>> {
            proptest::collection::hash_map(context_key(), "[a-zA-Z0-9 ]{0,12}", 0..6)
                .prop_map(|m| m.into_iter().collect())
        }

        proptest! {
            #[test]
            fn resolved_record_matches_store_contents(
                lookup in context_key(),
                env in context_key(),
                fields in record_fields(),
            ) {
                prop_assume!(lookup != env);
                let mut ctx = JsonContext::new();
                ctx.set(lookup.clone(), Value::String(env.clone()));
                ctx.set(
                    env.clone(),
                    Value::Object(
                        fields
                            .iter()
                            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                            .collect(),
                    ),
                );

                let record = resolve_environment(&ctx, &lookup).unwrap();
                prop_assert_eq!(record.len(), fields.len());
                for (k, v) in &fields {
                    prop_assert_eq!(record.get_str(k), Some(v.as_str()));
                }
            }

            #[test]
            fn missing_lookup_key_always_fails(
                lookup in context_key(),
                fields in record_fields(),
            ) {
                // Store holds records but never the lookup key itself.
                let mut ctx = JsonContext::new();
                for (k, v) in &fields {
                    if *k != lookup {
                        ctx.set(k.clone(), Value::String(v.clone()));
                    }
                }

                let result = resolve_environment(&ctx, &lookup);
                let is_missing = matches!(
                    result,
                    Err(crate::Error::ConfigurationMissing { .. })
                );
                prop_assert!(is_missing);
            }
        }
    }
}
