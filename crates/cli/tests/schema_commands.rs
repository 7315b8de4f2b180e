use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

const USER_SCHEMA: &str = r#"
name: { type: String, required: true }
age: { type: Number, min: 18 }
role: { type: String, enum: [admin, member], default: member }
profile:
  theme: { type: String, default: dark }
"#;

struct Workspace {
    _tmp: TempDir,
    root: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("schemas")).unwrap();
        fs::write(root.join("schemas/user.yaml"), USER_SCHEMA).unwrap();
        fs::write(root.join("schemas/order.json"), r#"{"total": {"type": "Number", "min": 0}}"#)
            .unwrap();

        let config = root.join("config.toml");
        fs::write(
            &config,
            r#"
version = 1
[profiles.default]
schemas_dir = "{{config_dir}}/schemas"
"#,
        )
        .unwrap();

        Self { _tmp: tmp, root, config }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docshape"));
        cmd.arg("--config").arg(&self.config);
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn list_prints_schema_names() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("order\nuser\n"))
        .stdout(predicate::str::contains("-- 2 schemas --"));
}

#[test]
fn list_reports_empty_directory() {
    let ws = Workspace::new();
    fs::remove_dir_all(ws.root.join("schemas")).unwrap();
    ws.cmd().arg("list").assert().success().stdout(predicate::str::contains("(no schemas found)"));
}

#[test]
fn validate_accepts_valid_document() {
    let ws = Workspace::new();
    let doc = ws.write("ada.json", r#"{"name": "Ada", "age": 36}"#);
    ws.cmd()
        .args(["validate", "--schema", "user", arg(&doc)])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK   "))
        .stdout(predicate::str::contains("1 documents checked, 0 invalid"));
}

#[test]
fn validate_reports_every_violation() {
    let ws = Workspace::new();
    let doc = ws.write("bad.json", r#"{"age": 12, "role": "root"}"#);
    ws.cmd()
        .args(["validate", "--schema", "user", arg(&doc)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL "))
        .stdout(predicate::str::contains("  - name: name is required"))
        .stdout(predicate::str::contains("  - age: age must be at least 18"))
        .stdout(predicate::str::contains("  - role: role must be one of: admin, member"));
}

#[test]
fn validate_labels_documents_in_an_array() {
    let ws = Workspace::new();
    let docs = ws.write("batch.json", r#"[{"total": 3}, {"total": -1}]"#);
    ws.cmd()
        .args(["validate", "--schema", "order", arg(&docs)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("batch.json[0]"))
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("total must be at least 0"))
        .stdout(predicate::str::contains("2 documents checked, 1 invalid"));
}

#[test]
fn validate_with_defaults_fills_before_checking() {
    let ws = Workspace::new();
    let schema = ws.write("status.yaml", "status: { type: String, required: true, default: open }\n");
    let doc = ws.write("empty.json", "{}");

    ws.cmd()
        .args(["validate", "--schema-file", arg(&schema), arg(&doc)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("status is required"));

    ws.cmd()
        .args(["validate", "--schema-file", arg(&schema), "--with-defaults", arg(&doc)])
        .assert()
        .success();
}

#[test]
fn validate_json_output() {
    let ws = Workspace::new();
    let doc = ws.write("bad.json", r#"{"total": "lots"}"#);
    let output = ws
        .cmd()
        .args(["validate", "--schema", "order", "--json", arg(&doc)])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["valid"], false);
    assert_eq!(reports[0]["errors"][0]["field"], "total");
    assert_eq!(reports[0]["errors"][0]["message"], "total must be of type Number");
}

#[test]
fn validate_unknown_schema_fails() {
    let ws = Workspace::new();
    let doc = ws.write("doc.json", "{}");
    ws.cmd()
        .args(["validate", "--schema", "invoice", arg(&doc)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invoice"));
}

#[test]
fn defaults_prints_filled_document() {
    let ws = Workspace::new();
    let doc = ws.write("ada.json", r#"{"name": "Ada", "role": null}"#);
    let output =
        ws.cmd().args(["defaults", "--schema", "user", arg(&doc)]).output().unwrap();

    assert!(output.status.success());
    let filled: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        filled,
        serde_json::json!({"name": "Ada", "role": null, "profile": {"theme": "dark"}})
    );
}
