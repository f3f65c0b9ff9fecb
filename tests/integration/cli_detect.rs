//! Integration tests for the `sam-detect detect` command.

use assert_cmd::Command;
use predicates::prelude::*;
use sam_detect::test_utils::TemplateFixture;
use tempfile::TempDir;

/// A `sam-detect` command isolated from the user's settings file.
fn sam_detect(settings_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sam-detect").unwrap();
    cmd.arg("--config").arg(settings_dir.path().join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_detect_text_output() {
    let settings = TempDir::new().unwrap();
    let app = TempDir::new().unwrap();
    let template = TemplateFixture::with_functions(["HelloWorldFunction"])
        .write_to(app.path(), "template.yml")
        .unwrap();

    sam_detect(&settings)
        .arg("detect")
        .arg(app.path())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("HelloWorldFunction"))
        .stdout(predicate::str::contains(template.display().to_string()));
}

#[test]
fn test_detect_json_output() {
    let settings = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    TemplateFixture::with_functions(["MyFunction1"]).write_to(first.path(), "template.yaml").unwrap();
    let second = TempDir::new().unwrap();
    TemplateFixture::with_functions(["MyFunction2"]).write_to(second.path(), "template.yml").unwrap();

    let output = sam_detect(&settings)
        .args(["detect", "--format", "json"])
        .arg(first.path())
        .arg(second.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "MyFunction1");
    assert_eq!(records[1]["name"], "MyFunction2");
    assert_eq!(
        records[1]["templatePath"],
        second.path().join("template.yml").display().to_string()
    );
}

#[test]
fn test_detect_nothing_found() {
    let settings = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();

    sam_detect(&settings)
        .arg("detect")
        .arg(empty.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No local functions found"));
}

#[test]
fn test_detect_warns_about_broken_template() {
    let settings = TempDir::new().unwrap();
    let broken = TempDir::new().unwrap();
    std::fs::write(broken.path().join("template.yml"), "Resources:\n  A: [unclosed\n").unwrap();
    let good = TempDir::new().unwrap();
    TemplateFixture::with_functions(["Survivor"]).write_to(good.path(), "template.yml").unwrap();

    sam_detect(&settings)
        .arg("detect")
        .arg(broken.path())
        .arg(good.path())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Survivor"))
        .stderr(predicate::str::contains("warning: skipped folder"))
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("Invalid template syntax").count() == 1
        }))
        .stderr(predicate::str::contains("every workspace folder failed").not());
}

#[cfg(unix)]
#[test]
fn test_detect_unreadable_first_folder_does_not_abort() {
    use std::os::unix::fs::symlink;

    let settings = TempDir::new().unwrap();
    let looped = TempDir::new().unwrap();
    for name in [".sam-detect.toml", "template.yml"] {
        let path = looped.path().join(name);
        symlink(&path, &path).unwrap();
    }
    let good = TempDir::new().unwrap();
    TemplateFixture::with_functions(["Good"]).write_to(good.path(), "template.yml").unwrap();

    for folders in [[looped.path(), good.path()], [good.path(), looped.path()]] {
        sam_detect(&settings)
            .arg("detect")
            .args(folders)
            .env("NO_COLOR", "1")
            .assert()
            .success()
            .stdout(predicate::str::contains("Good"))
            .stderr(predicate::str::contains("warning: skipped folder"));
    }
}

#[test]
fn test_detect_warns_when_every_folder_failed() {
    let settings = TempDir::new().unwrap();
    let broken = TempDir::new().unwrap();
    std::fs::write(broken.path().join("template.yaml"), "Resources: {\n").unwrap();

    sam_detect(&settings)
        .arg("detect")
        .arg(broken.path())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("every workspace folder failed"));
}

#[test]
fn test_detect_fail_fast() {
    let settings = TempDir::new().unwrap();
    let broken = TempDir::new().unwrap();
    std::fs::write(broken.path().join("template.yml"), "Resources:\n  A: [unclosed\n").unwrap();

    sam_detect(&settings)
        .args(["detect", "--fail-fast"])
        .arg(broken.path())
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error: Invalid template syntax"))
        .stderr(predicate::str::contains("suggestion:"));
}

#[test]
fn test_detect_abort_policy_from_settings() {
    let settings = TempDir::new().unwrap();
    std::fs::write(settings.path().join("config.toml"), "[detect]\nfailure_policy = \"abort\"\n")
        .unwrap();
    let broken = TempDir::new().unwrap();
    std::fs::write(broken.path().join("template.yml"), "Resources:\n  A: [unclosed\n").unwrap();

    sam_detect(&settings).arg("detect").arg(broken.path()).assert().failure();
}

#[test]
fn test_detect_workspace_settings_file() {
    let settings = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("api")).unwrap();
    TemplateFixture::with_functions(["ApiFunction"])
        .write_to(&root.path().join("api"), "template.yml")
        .unwrap();
    std::fs::write(root.path().join(".sam-detect.toml"), "[workspace]\nfolders = [\"api\"]\n")
        .unwrap();

    sam_detect(&settings)
        .current_dir(root.path())
        .arg("detect")
        .assert()
        .success()
        .stdout(predicate::str::contains("ApiFunction"));
}

#[test]
fn test_detect_invalid_settings_file() {
    let settings = TempDir::new().unwrap();
    std::fs::write(settings.path().join("config.toml"), "[detect\n").unwrap();
    let app = TempDir::new().unwrap();

    sam_detect(&settings)
        .arg("detect")
        .arg(app.path())
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid settings file syntax"));
}
