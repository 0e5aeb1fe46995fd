// tests/integration/fs_abstraction.rs

use std::path::{Path, PathBuf};

use launchset::config::{discover, load_with, write_to_path};
use launchset::errors::LaunchsetError;
use launchset::fs::FileSystem;
use launchset::fs::mock::MockFileSystem;
use launchset::role::Role;

const API_JS: &str = "module.exports = { apps: [{ name: 'api_service', script: '/app/dist/main.js', instances: 2, exec_mode: 'cluster', env: { NODE_ENV: 'production' } }] };";

const CRON_TOML: &str = r#"
[[apps]]
name = "cron_worker"
script = "/app/dist/main.js"

[apps.env]
IS_CRON_WORKER = "true"
"#;

fn deploy_dir() -> MockFileSystem {
    MockFileSystem::new()
        .with_file("deploy/ecosystem.api.config.js", API_JS)
        .with_file("deploy/ecosystem.cron.config.toml", CRON_TOML)
        .with_file("deploy/README.md", "# notes")
        .with_file("deploy/nested/ecosystem.config.js", API_JS)
}

#[test]
fn discovery_matches_default_pattern_and_skips_subdirs() {
    let fs = deploy_dir();

    let found = discover(&fs, Path::new("deploy"), &[]).unwrap();

    assert_eq!(
        found,
        vec![
            PathBuf::from("deploy/ecosystem.api.config.js"),
            PathBuf::from("deploy/ecosystem.cron.config.toml"),
        ]
    );
}

#[test]
fn discovery_honours_custom_patterns() {
    let fs = deploy_dir();

    let found = discover(&fs, Path::new("deploy"), &["*.toml".to_string(), "*.md".to_string()]).unwrap();

    assert_eq!(
        found,
        vec![
            PathBuf::from("deploy/README.md"),
            PathBuf::from("deploy/ecosystem.cron.config.toml"),
        ]
    );
}

#[test]
fn discovery_of_missing_dir_fails() {
    let fs = deploy_dir();
    assert!(discover(&fs, Path::new("elsewhere"), &[]).is_err());
}

#[test]
fn load_and_write_through_mock_fs() {
    let fs = deploy_dir();

    let cron = load_with(&fs, Path::new("deploy/ecosystem.cron.config.toml")).unwrap();
    assert_eq!(cron.app("cron_worker").unwrap().role().unwrap(), Role::Cron);

    let api = load_with(&fs, Path::new("deploy/ecosystem.api.config.js")).unwrap();
    let out = Path::new("out/ecosystem.api.config.json");
    write_to_path(&fs, out, &api.clone().into_raw()).unwrap();

    assert!(fs.is_file(out));
    assert!(fs.contents(out).unwrap().contains("\"exec_mode\": \"cluster\""));
    assert_eq!(load_with(&fs, out).unwrap(), api);
}

#[test]
fn missing_and_directory_paths_are_io_errors() {
    let fs = deploy_dir();

    match load_with(&fs, Path::new("deploy/ecosystem.worker.config.js")) {
        Err(LaunchsetError::IoError(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            assert!(e.to_string().contains("deploy/ecosystem.worker.config.js"), "{e}");
        }
        other => panic!("Expected IoError, got: {:?}", other),
    }

    let fs = fs.with_file("deploy/bundle.js/app.js", API_JS);
    match load_with(&fs, Path::new("deploy/bundle.js")) {
        Err(LaunchsetError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::IsADirectory),
        other => panic!("Expected IoError, got: {:?}", other),
    }
}
