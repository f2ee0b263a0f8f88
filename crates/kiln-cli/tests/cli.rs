//! Command-line surface of the `kiln` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn kiln() -> Command {
    let mut cmd = Command::cargo_bin("kiln").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/public/styles/site.styl", "body { color: #336699; }\n");
    write(temp.path(), "src/public/javascript/app.js", "var answer = 40 + 2;\nconsole.log(answer);\n");
    write(temp.path(), "index.html", "<!doctype html>\n");
    temp
}

#[test]
fn test_no_task_prints_listing() {
    kiln()
        .assert()
        .success()
        .stdout(predicate::str::contains("Main Tasks"))
        .stdout(predicate::str::contains("Sub Tasks"))
        .stdout(predicate::str::contains("build-javascript-production"));
}

#[test]
fn test_help_task_lists_every_task() {
    let assert = kiln().arg("help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for name in [
        "build",
        "build-development",
        "build-javascript",
        "build-css",
        "build-index",
        "build-partials",
        "watch",
        "clean",
        "serve",
    ] {
        assert!(stdout.contains(name), "missing {}", name);
    }
}

#[test]
fn test_unknown_task_is_rejected() {
    kiln()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'deploy'"));
}

#[test]
fn test_build_writes_production_bundles() {
    let temp = project();

    kiln()
        .args(["build", "--cwd"])
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Build Summary"));

    assert!(temp.path().join("dist/css/weel.css").is_file());
    assert!(temp.path().join("dist/javascript/weel.js").is_file());
    assert!(temp.path().join("dist/index.html").is_file());
    assert!(!temp.path().join("dist/css/site.css").exists());
}

#[test]
fn test_build_development_reads_kiln_toml() {
    let temp = project();
    write(
        temp.path(),
        "kiln.toml",
        "[paths]\ndist = \"public\"\n",
    );

    kiln()
        .args(["build-development", "--cwd"])
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("public/css/site.css").is_file());
    assert!(temp.path().join("public/javascript/app.js").is_file());
    assert!(!temp.path().join("dist").exists());
}

#[test]
fn test_malformed_script_fails_build() {
    let temp = project();
    write(temp.path(), "src/public/javascript/broken.js", "if (\n");

    kiln()
        .args(["build-javascript-production", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("script-prod"));

    assert!(!temp.path().join("dist/javascript").exists());
}

#[test]
fn test_build_partials_requires_configuration() {
    let temp = project();

    kiln()
        .args(["build-partials", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("paths.partials"));
}

#[test]
fn test_clean_removes_distribution_directory() {
    let temp = project();
    write(temp.path(), "dist/css/old.css", "a{}");

    kiln()
        .args(["clean", "--cwd"])
        .arg(temp.path())
        .assert()
        .success();
    assert!(!temp.path().join("dist").exists());

    // a second clean has nothing to do and still succeeds
    kiln()
        .args(["clean", "--cwd"])
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Nothing to clean"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp = project();

    kiln()
        .args(["build", "--config", "missing.toml", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}
