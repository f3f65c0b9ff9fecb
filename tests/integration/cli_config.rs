//! Integration tests for the `sam-detect config` command.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct ConfigEnv {
    settings: TempDir,
    workspace: TempDir,
}

impl ConfigEnv {
    fn new() -> Self {
        Self {
            settings: TempDir::new().unwrap(),
            workspace: TempDir::new().unwrap(),
        }
    }

    fn user_file(&self) -> std::path::PathBuf {
        self.settings.path().join("config.toml")
    }

    fn workspace_file(&self) -> std::path::PathBuf {
        self.workspace.path().join(".sam-detect.toml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sam-detect").unwrap();
        cmd.current_dir(self.workspace.path())
            .arg("--config")
            .arg(self.user_file())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_set_and_get_user_setting() {
    let env = ConfigEnv::new();

    env.cmd().args(["config", "set", "detect.failure_policy", "abort"]).assert().success();

    let content = std::fs::read_to_string(env.user_file()).unwrap();
    assert!(content.contains("[detect]"));
    assert!(content.contains("failure_policy = \"abort\""));

    env.cmd()
        .args(["config", "get", "detect.failure_policy"])
        .assert()
        .success()
        .stdout("abort\n");
}

#[test]
fn test_workspace_setting_shadows_user_setting() {
    let env = ConfigEnv::new();

    env.cmd().args(["config", "set", "detect.max_concurrency", "2"]).assert().success();
    env.cmd()
        .args(["config", "set", "detect.max_concurrency", "6", "--workspace"])
        .assert()
        .success();
    assert!(env.workspace_file().exists());

    env.cmd().args(["config", "get", "detect.max_concurrency"]).assert().success().stdout("6\n");

    env.cmd()
        .args(["config", "unset", "detect.max_concurrency", "--workspace"])
        .assert()
        .success();
    env.cmd().args(["config", "get", "detect.max_concurrency"]).assert().success().stdout("2\n");
}

#[test]
fn test_get_unset_key_prints_nothing() {
    let env = ConfigEnv::new();

    env.cmd()
        .args(["config", "get", "detect.failure_policy"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_set_rejects_invalid_value() {
    let env = ConfigEnv::new();

    env.cmd()
        .args(["config", "set", "detect.max_concurrency", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("detect.max_concurrency"));
    assert!(!env.user_file().exists());
}

#[test]
fn test_set_array_value() {
    let env = ConfigEnv::new();

    env.cmd()
        .args(["config", "set", "workspace.folders", r#"["api", "worker"]"#, "--workspace"])
        .assert()
        .success();

    let content = std::fs::read_to_string(env.workspace_file()).unwrap();
    let table: toml::Table = toml::from_str(&content).unwrap();
    let folders = table["workspace"]["folders"].as_array().unwrap();
    assert_eq!(folders.len(), 2);
}

#[test]
fn test_path_lists_both_scopes() {
    let env = ConfigEnv::new();

    env.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("user: {}", env.user_file().display())))
        .stdout(predicate::str::contains("workspace: "))
        .stdout(predicate::str::contains(".sam-detect.toml"));
}
