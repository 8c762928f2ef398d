use lambdakit_core::{Error, JsonContext, resolve_environment};
use serde_json::json;
use tempfile::TempDir;

fn write_context(tmp: &TempDir, content: &str) -> std::path::PathBuf {
    let path = tmp.path().join("context.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_reads_top_level_object() {
    let tmp = TempDir::new().unwrap();
    let path = write_context(
        &tmp,
        r#"{
            "config": "dev",
            "dev": { "project": "billing", "environment": "dev" },
            "prod": { "project": "billing", "environment": "prod" }
        }"#,
    );

    let ctx = JsonContext::load(&path).unwrap();
    let record = resolve_environment(&ctx, "config").unwrap();

    assert_eq!(record.get_str("project"), Some("billing"));
    assert_eq!(record.get_str("environment"), Some("dev"));
}

#[test]
fn load_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    let result = JsonContext::load(&tmp.path().join("absent.json"));

    assert!(matches!(result, Err(Error::ContextLoad { .. })));
}

#[test]
fn load_invalid_json_fails() {
    let tmp = TempDir::new().unwrap();
    let path = write_context(&tmp, "{ not json");

    let result = JsonContext::load(&path);
    assert!(matches!(result, Err(Error::ContextParse { .. })));
}

#[test]
fn load_non_object_top_level_fails() {
    let tmp = TempDir::new().unwrap();
    let path = write_context(&tmp, r#"["dev", "prod"]"#);

    let result = JsonContext::load(&path);
    assert!(matches!(result, Err(Error::ContextNotObject { .. })));
}

#[test]
fn resolution_does_not_mutate_store() {
    let mut ctx = JsonContext::new();
    ctx.set("config", json!("dev"));
    ctx.set("dev", json!({ "project": "p1", "environment": "dev" }));

    let first = resolve_environment(&ctx, "config").unwrap();
    let second = resolve_environment(&ctx, "config").unwrap();

    assert_eq!(first, second);
}

#[test]
fn require_str_reports_missing_field() {
    let mut ctx = JsonContext::new();
    ctx.set("config", json!("dev"));
    ctx.set("dev", json!({ "environment": "dev" }));

    let record = resolve_environment(&ctx, "config").unwrap();
    let err = record.require_str("project").unwrap_err();

    assert!(matches!(
        err,
        Error::RecordFieldMissing { ref field } if field == "project"
    ));
}

#[test]
fn require_str_rejects_non_string_field() {
    let mut ctx = JsonContext::new();
    ctx.set("config", json!("dev"));
    ctx.set("dev", json!({ "project": 7, "environment": "dev" }));

    let record = resolve_environment(&ctx, "config").unwrap();
    assert!(record.require_str("project").is_err());
}
