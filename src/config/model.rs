// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{LaunchsetError, Result};
use crate::role::{NODE_ENV, Role};
use crate::types::{ExecMode, MemorySize};

/// Descriptor set exactly as parsed, before any semantic validation.
///
/// This is a direct mapping of the process manager's file shape:
///
/// ```js
/// module.exports = {
///     apps: [
///         {
///             name: 'api_service',
///             script: '/app/dist/main.js',
///             instances: 2,
///             exec_mode: "cluster",
///             max_memory_restart: '1000M',
///             watch: false,
///             env: { NODE_ENV: 'production', IS_CRON_WORKER: 'false' },
///         },
///     ],
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawDescriptorSet {
    #[serde(default)]
    pub apps: Vec<ProcessSpec>,
}

/// A validated descriptor set.
///
/// Only constructible through `TryFrom<RawDescriptorSet>` (see `validate.rs`),
/// so holding one means every invariant has been checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptorSet {
    apps: Vec<ProcessSpec>,
}

impl DescriptorSet {
    pub(crate) fn new_unchecked(apps: Vec<ProcessSpec>) -> Self {
        Self { apps }
    }

    /// Apps in authored order.
    pub fn apps(&self) -> &[ProcessSpec] {
        &self.apps
    }

    pub fn app(&self, name: &str) -> Result<&ProcessSpec> {
        self.apps
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| LaunchsetError::AppNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// The artifact every app launches. Validation guarantees there is one.
    pub fn entry_point(&self) -> &Path {
        &self.apps[0].script
    }

    /// Number of OS processes the manager will start for the whole set.
    pub fn total_instances(&self) -> u64 {
        self.apps.iter().map(|a| u64::from(a.instances)).sum()
    }

    pub fn into_raw(self) -> RawDescriptorSet {
        RawDescriptorSet { apps: self.apps }
    }
}

impl From<DescriptorSet> for RawDescriptorSet {
    fn from(set: DescriptorSet) -> Self {
        set.into_raw()
    }
}

/// One entry of `apps`.
///
/// Field order here is the order renderers emit keys in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSpec {
    /// Handle the process manager uses for start/stop/restart/inspect.
    pub name: String,

    /// Absolute path to the shared compiled artifact.
    pub script: PathBuf,

    /// Number of OS processes to launch.
    #[serde(default = "default_instances")]
    pub instances: u32,

    #[serde(default)]
    pub exec_mode: ExecMode,

    /// Restart threshold for resident memory; `None` means no ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memory_restart: Option<MemorySize>,

    /// Restart on filesystem changes. Production descriptors keep this off.
    #[serde(default)]
    pub watch: bool,

    /// Variables merged into the process environment at launch.
    ///
    /// Booleans and numbers are accepted and stored as their string form,
    /// since that is what the launched process sees.
    #[serde(default, deserialize_with = "deserialize_env")]
    pub env: BTreeMap<String, String>,
}

fn default_instances() -> u32 {
    1
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            instances: default_instances(),
            exec_mode: ExecMode::default(),
            max_memory_restart: None,
            watch: false,
            env: BTreeMap::new(),
        }
    }

    /// Role selected by this spec's flags.
    pub fn role(&self) -> Result<Role> {
        Role::from_env(&self.name, &self.env)
    }

    /// Deployment tier (`NODE_ENV`), if set.
    pub fn tier(&self) -> Option<&str> {
        self.env.get(NODE_ENV).map(String::as_str)
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} x{})",
            self.name, self.exec_mode, self.instances
        )
    }
}

fn deserialize_env<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EnvValue {
        Text(String),
        Flag(bool),
        Int(i64),
        UInt(u64),
        Float(f64),
    }

    let raw = BTreeMap::<String, EnvValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                EnvValue::Text(s) => s,
                EnvValue::Flag(b) => b.to_string(),
                EnvValue::Int(n) => n.to_string(),
                EnvValue::UInt(n) => n.to_string(),
                EnvValue::Float(x) => x.to_string(),
            };
            (k, v)
        })
        .collect())
}
