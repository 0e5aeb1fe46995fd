// tests/integration/error_handling.rs

use launchset::config::{load_and_validate, load_from_path};
use launchset::errors::LaunchsetError;
use launchset::role::Role;

use crate::common::descriptor_file;

#[test]
fn duplicate_name_in_js_file_returns_structured_error() {
    let file = descriptor_file(
        "js",
        r#"
module.exports = {
    apps: [
        { name: 'api_service', script: '/app/dist/main.js' },
        { name: 'api_service', script: '/app/dist/main.js', exec_mode: 'fork' },
    ],
};
"#,
    );

    match load_and_validate(file.path()) {
        Err(LaunchsetError::DuplicateName(name)) => assert_eq!(name, "api_service"),
        Err(e) => panic!("Expected DuplicateName error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn mixed_entry_points_in_toml_file_are_rejected() {
    let file = descriptor_file(
        "toml",
        r#"
[[apps]]
name = "api_service"
script = "/app/dist/main.js"

[[apps]]
name = "cron"
script = "/app/dist/other.js"
"#,
    );

    match load_and_validate(file.path()) {
        Err(LaunchsetError::MixedEntryPoints { app, .. }) => assert_eq!(app, "cron"),
        Err(e) => panic!("Expected MixedEntryPoints error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_instances_in_json_file_are_rejected() {
    let file = descriptor_file(
        "json",
        r#"{ "apps": [ { "name": "api", "script": "/app/dist/main.js", "instances": 0 } ] }"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(LaunchsetError::InvalidInstances { value: 0, .. })
    ));
}

#[test]
fn unknown_exec_mode_fails_while_parsing() {
    let file = descriptor_file(
        "js",
        "module.exports = { apps: [{ name: 'a', script: '/x.js', exec_mode: 'parallel' }] };",
    );

    match load_and_validate(file.path()) {
        Err(LaunchsetError::JsonError(e)) => assert!(e.to_string().contains("parallel")),
        Err(e) => panic!("Expected JsonError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn misspelled_option_key_is_rejected() {
    let file = descriptor_file(
        "js",
        "module.exports = { apps: [{ name: 'a', script: '/x.js', exec_mod: 'fork' }] };",
    );

    match load_and_validate(file.path()) {
        Err(LaunchsetError::JsonError(e)) => {
            let msg = e.to_string();
            assert!(msg.contains("unknown field"), "{msg}");
            assert!(msg.contains("exec_mod"), "{msg}");
        }
        Err(e) => panic!("Expected JsonError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_memory_ceiling_is_rejected() {
    let file = descriptor_file(
        "toml",
        r#"
[[apps]]
name = "api"
script = "/app/dist/main.js"
max_memory_restart = "lots"
"#,
    );

    match load_and_validate(file.path()) {
        Err(LaunchsetError::TomlError(e)) => {
            assert!(e.to_string().contains("invalid max_memory_restart"), "{e}");
        }
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn native_boolean_flags_are_read_as_strings() {
    let file = descriptor_file(
        "js",
        "module.exports = { apps: [{ name: 'cron', script: '/x.js', env: { IS_CRON_WORKER: true, IS_TEMPORAL_WORKER: false } }] };",
    );

    let set = load_and_validate(file.path()).unwrap();
    let cron = set.app("cron").unwrap();
    assert_eq!(cron.env.get("IS_CRON_WORKER").map(String::as_str), Some("true"));
    assert_eq!(cron.role().unwrap(), Role::Cron);
}

#[test]
fn unsupported_extension_is_rejected() {
    let file = descriptor_file("yaml", "apps: []\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(LaunchsetError::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file_surfaces_an_io_error() {
    match load_and_validate("/definitely/not/here/ecosystem.config.js") {
        Err(LaunchsetError::IoError(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            assert!(e.to_string().contains("/definitely/not/here"), "{e}");
        }
        Err(e) => panic!("Expected IoError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn raw_load_skips_semantic_checks() {
    let file = descriptor_file(
        "js",
        r#"
module.exports = {
    apps: [
        { name: 'api_service', script: 'dist/main.js' },
        { name: 'api_service', script: '/app/dist/main.js', env: { IS_CRON_WORKER: 'yes' } },
    ],
};
"#,
    );

    let raw = load_from_path(file.path()).unwrap();
    assert_eq!(raw.apps.len(), 2);
    assert_eq!(raw.apps[1].env.get("IS_CRON_WORKER").map(String::as_str), Some("yes"));

    assert!(matches!(
        load_and_validate(file.path()),
        Err(LaunchsetError::RelativeEntryPoint { .. } | LaunchsetError::DuplicateName(_))
    ));
}

#[test]
fn raw_load_still_reports_syntax_errors() {
    let file = descriptor_file("json", r#"{ "apps": [ { "name": "a", "#);

    assert!(matches!(load_from_path(file.path()), Err(LaunchsetError::JsonError(_))));
}
