// src/config/validate.rs

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::model::{DescriptorSet, ProcessSpec, RawDescriptorSet};
use crate::errors::{LaunchsetError, Result};

static ENV_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("env key pattern is valid")
});

impl TryFrom<RawDescriptorSet> for DescriptorSet {
    type Error = LaunchsetError;

    fn try_from(raw: RawDescriptorSet) -> std::result::Result<Self, Self::Error> {
        validate_descriptor_set(&raw)?;
        Ok(DescriptorSet::new_unchecked(raw.apps))
    }
}

/// Check every invariant of a parsed set.
///
/// Stops at the first violation. Issues that the process manager would accept
/// but that look wrong for a production descriptor are logged as warnings.
pub fn validate_descriptor_set(raw: &RawDescriptorSet) -> Result<()> {
    ensure_has_apps(raw)?;
    validate_unique_names(raw)?;
    validate_shared_entry_point(raw)?;
    for app in &raw.apps {
        validate_app(app)?;
        warn_on_suspicious(app);
    }
    debug!(apps = raw.apps.len(), "descriptor set validated");
    Ok(())
}

fn ensure_has_apps(raw: &RawDescriptorSet) -> Result<()> {
    if raw.apps.is_empty() {
        return Err(LaunchsetError::EmptySet);
    }
    Ok(())
}

fn validate_unique_names(raw: &RawDescriptorSet) -> Result<()> {
    let mut seen = HashSet::new();
    for app in &raw.apps {
        if !seen.insert(app.name.as_str()) {
            return Err(LaunchsetError::DuplicateName(app.name.clone()));
        }
    }
    Ok(())
}

fn validate_shared_entry_point(raw: &RawDescriptorSet) -> Result<()> {
    let expected = &raw.apps[0].script;
    for app in raw.apps.iter().skip(1) {
        if &app.script != expected {
            return Err(LaunchsetError::MixedEntryPoints {
                app: app.name.clone(),
                expected: expected.clone(),
                found: app.script.clone(),
            });
        }
    }
    Ok(())
}

fn validate_app(app: &ProcessSpec) -> Result<()> {
    // exec_mode and max_memory_restart are typed and checked while parsing.

    if app.instances == 0 {
        return Err(LaunchsetError::InvalidInstances {
            app: app.name.clone(),
            value: app.instances,
        });
    }

    if !app.script.has_root() {
        return Err(LaunchsetError::RelativeEntryPoint {
            app: app.name.clone(),
            script: app.script.clone(),
        });
    }

    for key in app.env.keys() {
        if !ENV_KEY_RE.is_match(key) {
            return Err(LaunchsetError::InvalidEnvKey {
                app: app.name.clone(),
                key: key.clone(),
            });
        }
    }

    // Flag values and role exclusivity.
    app.role()?;

    Ok(())
}

fn warn_on_suspicious(app: &ProcessSpec) {
    if app.watch {
        warn!(app = %app.name, "watch is enabled; the manager will restart on file changes");
    }
    if app.tier().is_none() {
        warn!(app = %app.name, "NODE_ENV is not set");
    }
    if app.max_memory_restart.is_none() {
        warn!(app = %app.name, "no max_memory_restart ceiling");
    }
}
