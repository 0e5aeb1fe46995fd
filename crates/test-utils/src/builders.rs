#![allow(dead_code)]

use std::path::PathBuf;

use launchset::config::{DescriptorSet, ProcessSpec, RawDescriptorSet};
use launchset::role::{NODE_ENV, Role};
use launchset::types::{ExecMode, MemorySize};

pub const ENTRY_POINT: &str = "/app/dist/main.js";

/// Builder for `DescriptorSet` to simplify test setup.
pub struct DescriptorSetBuilder {
    raw: RawDescriptorSet,
}

impl DescriptorSetBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawDescriptorSet { apps: Vec::new() },
        }
    }

    pub fn with_app(mut self, app: ProcessSpec) -> Self {
        self.raw.apps.push(app);
        self
    }

    /// The parsed-but-unchecked form, for feeding invalid sets to validation.
    pub fn build_raw(self) -> RawDescriptorSet {
        self.raw
    }

    pub fn build(self) -> DescriptorSet {
        DescriptorSet::try_from(self.raw).expect("Failed to build valid descriptor set from builder")
    }
}

impl Default for DescriptorSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProcessSpec`, defaulting to a production API spec on the
/// shared entry point.
pub struct ProcessSpecBuilder {
    spec: ProcessSpec,
}

impl ProcessSpecBuilder {
    pub fn new(name: &str) -> Self {
        let mut spec = ProcessSpec::new(name, ENTRY_POINT);
        spec.max_memory_restart = Some(MemorySize::DEFAULT_CEILING);
        spec.env.insert(NODE_ENV.to_string(), "production".to_string());
        Self { spec }
    }

    pub fn script(mut self, script: &str) -> Self {
        self.spec.script = PathBuf::from(script);
        self
    }

    pub fn instances(mut self, n: u32) -> Self {
        self.spec.instances = n;
        self
    }

    pub fn exec_mode(mut self, mode: ExecMode) -> Self {
        self.spec.exec_mode = mode;
        self
    }

    pub fn cluster(self) -> Self {
        self.exec_mode(ExecMode::Cluster)
    }

    pub fn memory(mut self, ceiling: Option<MemorySize>) -> Self {
        self.spec.max_memory_restart = ceiling;
        self
    }

    pub fn watch(mut self, val: bool) -> Self {
        self.spec.watch = val;
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.spec.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Set every role flag explicitly for `role`.
    pub fn role(mut self, role: Role) -> Self {
        self.spec.env.extend(role.flag_env());
        self
    }

    pub fn build(self) -> ProcessSpec {
        self.spec
    }
}
