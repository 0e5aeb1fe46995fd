#![allow(deprecated)] // assert_cmd: cargo_bin

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn descriptors(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("descriptors").join(rel)
}

fn launchset() -> Command {
    Command::cargo_bin("launchset").unwrap()
}

#[test]
fn help_lists_subcommands() {
    launchset()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("digest"));
}

#[test]
fn validate_discovers_shipped_directory() {
    launchset()
        .args(["validate", "--dir"])
        .arg(descriptors("app"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ok    "))
        .stdout(predicate::str::contains("ecosystem.cron.config.js"))
        .stdout(predicate::str::contains("ecosystem.bullmq.config.js"));
}

#[test]
fn validate_fails_on_broken_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("ecosystem.config.js");
    std::fs::write(
        &bad,
        "module.exports = { apps: [{ name: 'a', script: '/x.js', instances: 0 }] };",
    )
    .unwrap();

    launchset()
        .arg("validate")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("invalid instances"));
}

#[test]
fn validate_without_inputs_is_an_error() {
    launchset().arg("validate").assert().failure();
}

#[test]
fn show_prints_roles_and_plan_totals() {
    launchset()
        .arg("show")
        .arg(descriptors("strapi/ecosystem.config.js"))
        .assert()
        .success()
        .stdout(predicate::str::contains("apps (3):"))
        .stdout(predicate::str::contains("role: workflow"))
        .stdout(predicate::str::contains("plan: 3 processes"));
}

#[test]
fn render_preset_as_json_to_stdout() {
    launchset()
        .args(["render", "--preset", "cron", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"cron_worker\""))
        .stdout(predicate::str::contains("\"exec_mode\": \"fork\""));
}

#[test]
fn render_to_file_then_validate_it() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ecosystem.worker.config.toml");

    launchset()
        .args(["render", "--preset", "worker", "--tier", "staging", "--output"])
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("[[apps]]"));
    assert!(text.contains("NODE_ENV = \"staging\""));

    launchset().arg("validate").arg(&out).assert().success();
}

#[test]
fn env_prints_launch_environment() {
    launchset()
        .args(["env", "--app", "cron"])
        .arg(descriptors("strapi/ecosystem.config.js"))
        .assert()
        .success()
        .stdout(predicate::str::contains("IS_CRON_WORKER=true"))
        .stdout(predicate::str::contains("NODE_APP_INSTANCE=0"))
        .stdout(predicate::str::contains("NODE_ENV=production"));
}

#[test]
fn env_inherit_merges_caller_environment() {
    launchset()
        .args(["env", "--app", "cron", "--inherit"])
        .arg(descriptors("strapi/ecosystem.config.js"))
        .env("LAUNCHSET_INHERITED", "from-shell")
        .env("NODE_ENV", "development")
        .assert()
        .success()
        .stdout(predicate::str::contains("LAUNCHSET_INHERITED=from-shell"))
        .stdout(predicate::str::contains("NODE_ENV=production"))
        .stdout(predicate::str::contains("IS_CRON_WORKER=true"));
}

#[test]
fn env_without_inherit_ignores_caller_environment() {
    launchset()
        .args(["env", "--app", "cron"])
        .arg(descriptors("strapi/ecosystem.config.js"))
        .env("LAUNCHSET_INHERITED", "from-shell")
        .assert()
        .success()
        .stdout(predicate::str::contains("LAUNCHSET_INHERITED").not());
}

#[cfg(unix)]
#[test]
fn env_inherit_skips_non_utf8_variables() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    launchset()
        .args(["env", "--app", "cron", "--inherit"])
        .arg(descriptors("strapi/ecosystem.config.js"))
        .env("LAUNCHSET_BAD_VALUE", OsStr::from_bytes(b"\xff"))
        .env(OsStr::from_bytes(b"LAUNCHSET_BAD_\xffKEY"), "x")
        .env("LAUNCHSET_INHERITED", "from-shell")
        .assert()
        .success()
        .stdout(predicate::str::contains("LAUNCHSET_INHERITED=from-shell"))
        .stdout(predicate::str::contains("LAUNCHSET_BAD").not())
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn env_rejects_unknown_app_and_instance() {
    launchset()
        .args(["env", "--app", "nope"])
        .arg(descriptors("strapi/ecosystem.config.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("App not found"));

    launchset()
        .args(["env", "--app", "api_service", "--instance", "5"])
        .arg(descriptors("app/ecosystem.api.config.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn digest_matches_across_formats() {
    let js = launchset()
        .arg("digest")
        .arg(descriptors("strapi/ecosystem.config.js"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let toml = launchset()
        .arg("digest")
        .arg(descriptors("strapi/ecosystem.config.toml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(js, toml);
}
