// src/preset.rs

//! Built-in deployment variants.
//!
//! The backend ships as one artifact split into several processes. Each
//! variant below is the descriptor set for one way of deploying it: one file
//! per role, or the `combined` layout where API, cron and workflow worker
//! share a single set.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::model::{DescriptorSet, ProcessSpec, RawDescriptorSet};
use crate::errors::Result;
use crate::role::{NODE_ENV, Role};
use crate::types::{ExecMode, MemorySize};

pub const DEFAULT_ENTRY_POINT: &str = "/app/dist/main.js";
pub const DEFAULT_TIER: &str = "production";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// API server only, clustered.
    Api,
    /// Cron runner only.
    Cron,
    /// Workflow-engine (Temporal) worker only.
    Worker,
    /// Queue (BullMQ) worker only.
    Bullmq,
    /// API, cron and workflow worker in one set.
    Combined,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Api,
        Preset::Cron,
        Preset::Worker,
        Preset::Bullmq,
        Preset::Combined,
    ];

    /// Descriptor file name this variant is conventionally stored under.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Preset::Api => "ecosystem.api.config",
            Preset::Cron => "ecosystem.cron.config",
            Preset::Worker => "ecosystem.worker.config",
            Preset::Bullmq => "ecosystem.bullmq.config",
            Preset::Combined => "ecosystem.config",
        }
    }

    /// Build the variant with the default entry point and tier.
    pub fn build(&self) -> Result<DescriptorSet> {
        PresetOptions::default().build(*self)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Preset::Api => "api",
            Preset::Cron => "cron",
            Preset::Worker => "worker",
            Preset::Bullmq => "bullmq",
            Preset::Combined => "combined",
        };
        f.write_str(s)
    }
}

/// Knobs shared by every preset.
#[derive(Debug, Clone)]
pub struct PresetOptions {
    pub entry_point: PathBuf,
    pub tier: String,
    pub memory_ceiling: MemorySize,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            entry_point: PathBuf::from(DEFAULT_ENTRY_POINT),
            tier: DEFAULT_TIER.to_string(),
            memory_ceiling: MemorySize::DEFAULT_CEILING,
        }
    }
}

impl PresetOptions {
    pub fn build(&self, preset: Preset) -> Result<DescriptorSet> {
        let apps = match preset {
            Preset::Api => vec![self.spec("api_service", Role::Api, 2, ExecMode::Cluster)],
            Preset::Cron => vec![self.spec("cron_worker", Role::Cron, 1, ExecMode::Fork)],
            Preset::Worker => vec![self.spec("temporal_worker", Role::Workflow, 1, ExecMode::Cluster)],
            Preset::Bullmq => vec![self.spec("bullmq_worker", Role::Queue, 1, ExecMode::Cluster)],
            Preset::Combined => vec![
                self.spec("api_service", Role::Api, 1, ExecMode::Cluster),
                self.spec("cron", Role::Cron, 1, ExecMode::Fork),
                self.spec("temporal", Role::Workflow, 1, ExecMode::Fork),
            ],
        };
        DescriptorSet::try_from(RawDescriptorSet { apps })
    }

    fn spec(&self, name: &str, role: Role, instances: u32, exec_mode: ExecMode) -> ProcessSpec {
        let mut env = role.flag_env();
        env.insert(NODE_ENV.to_string(), self.tier.clone());

        ProcessSpec {
            instances,
            exec_mode,
            max_memory_restart: Some(self.memory_ceiling),
            env,
            ..ProcessSpec::new(name, self.entry_point.clone())
        }
    }
}
