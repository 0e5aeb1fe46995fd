// src/role.rs

//! Role flags and the runtime role they select.
//!
//! Every spec in a set launches the same artifact. What the artifact does at
//! startup is chosen by a handful of environment flags:
//!
//! - `IS_CRON_WORKER`     → cron runner
//! - `IS_TEMPORAL_WORKER` → workflow-engine worker
//! - `IS_BULLMQ_WORKER`   → queue worker
//!
//! With none of them set to `"true"`, the artifact runs as the plain API server.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{LaunchsetError, Result};

pub const NODE_ENV: &str = "NODE_ENV";
pub const IS_CRON_WORKER: &str = "IS_CRON_WORKER";
pub const IS_TEMPORAL_WORKER: &str = "IS_TEMPORAL_WORKER";
pub const IS_BULLMQ_WORKER: &str = "IS_BULLMQ_WORKER";

/// All role flags, in the order they are rendered.
pub const ROLE_FLAGS: [&str; 3] = [IS_CRON_WORKER, IS_TEMPORAL_WORKER, IS_BULLMQ_WORKER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Api,
    Cron,
    Workflow,
    Queue,
}

impl Role {
    /// The flag that selects this role, or `None` for the API server.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Role::Api => None,
            Role::Cron => Some(IS_CRON_WORKER),
            Role::Workflow => Some(IS_TEMPORAL_WORKER),
            Role::Queue => Some(IS_BULLMQ_WORKER),
        }
    }

    pub fn from_flag(flag: &str) -> Option<Role> {
        match flag {
            IS_CRON_WORKER => Some(Role::Cron),
            IS_TEMPORAL_WORKER => Some(Role::Workflow),
            IS_BULLMQ_WORKER => Some(Role::Queue),
            _ => None,
        }
    }

    /// Explicit flag assignments for this role: its own flag `"true"`, every
    /// other flag `"false"`.
    pub fn flag_env(&self) -> BTreeMap<String, String> {
        ROLE_FLAGS
            .iter()
            .map(|flag| {
                let on = self.flag() == Some(*flag);
                (flag.to_string(), on.to_string())
            })
            .collect()
    }

    /// Work out the role selected by an environment map.
    ///
    /// `app` is only used for error messages. Flag values must be exactly
    /// `"true"` or `"false"`; at most one flag may be `"true"`.
    pub fn from_env(app: &str, env: &BTreeMap<String, String>) -> Result<Role> {
        let mut enabled = Vec::new();

        for flag in ROLE_FLAGS {
            let Some(value) = env.get(flag) else {
                continue;
            };
            if parse_flag(value).ok_or_else(|| LaunchsetError::InvalidFlagValue {
                app: app.to_string(),
                flag: flag.to_string(),
                value: value.clone(),
            })? {
                enabled.push(flag);
            }
        }

        match enabled.as_slice() {
            [] => Ok(Role::Api),
            [flag] => Ok(Role::from_flag(flag).unwrap_or(Role::Api)),
            flags => Err(LaunchsetError::ConflictingRoles {
                app: app.to_string(),
                flags: flags.iter().map(|f| f.to_string()).collect(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Api => "api",
            Role::Cron => "cron",
            Role::Workflow => "workflow",
            Role::Queue => "queue",
        };
        f.write_str(s)
    }
}

/// Flags are strings in the environment; only `"true"` / `"false"` are legal.
/// The launched artifact compares the raw string, so `"TRUE"` or `" true"`
/// would not select the role there.
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
