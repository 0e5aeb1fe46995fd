// src/plan.rs

//! Per-instance view of a descriptor set.
//!
//! The process manager turns each spec into `instances` OS processes. A
//! [`LaunchPlan`] spells that expansion out, with the environment each
//! process will start with, so a deployment can be reviewed before it is
//! handed to the manager. Nothing here starts a process.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::model::DescriptorSet;
use crate::errors::Result;
use crate::role::Role;
use crate::types::ExecMode;

/// Variable the manager sets to the zero-based instance index.
pub const INSTANCE_VAR: &str = "NODE_APP_INSTANCE";

/// One process the manager will be asked to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedProcess {
    pub app: String,
    pub instance: u32,
    pub role: Role,
    pub exec_mode: ExecMode,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct LaunchPlan {
    processes: Vec<PlannedProcess>,
    memory_budget: u64,
}

impl LaunchPlan {
    /// Expand `set` on top of `base_env`.
    ///
    /// Each process sees `base_env`, overridden by its spec's `env`, plus
    /// [`INSTANCE_VAR`].
    pub fn new(set: &DescriptorSet, base_env: &BTreeMap<String, String>) -> Result<Self> {
        let mut processes = Vec::new();
        let mut memory_budget: u64 = 0;

        for spec in set.apps() {
            let role = spec.role()?;

            if let Some(ceiling) = spec.max_memory_restart {
                memory_budget = memory_budget
                    .saturating_add(ceiling.bytes().saturating_mul(u64::from(spec.instances)));
            }

            for instance in 0..spec.instances {
                let mut env = base_env.clone();
                env.extend(spec.env.iter().map(|(k, v)| (k.clone(), v.clone())));
                env.insert(INSTANCE_VAR.to_string(), instance.to_string());

                processes.push(PlannedProcess {
                    app: spec.name.clone(),
                    instance,
                    role,
                    exec_mode: spec.exec_mode,
                    env,
                });
            }
        }

        debug!(processes = processes.len(), memory_budget, "built launch plan");
        Ok(Self {
            processes,
            memory_budget,
        })
    }

    pub fn processes(&self) -> &[PlannedProcess] {
        &self.processes
    }

    /// Processes belonging to one app, in instance order.
    pub fn for_app<'a>(&'a self, app: &'a str) -> impl Iterator<Item = &'a PlannedProcess> + 'a {
        self.processes.iter().filter(move |p| p.app == app)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Worst-case resident memory before any restart triggers: the sum of
    /// every ceiling times its instance count. Specs without a ceiling add
    /// nothing.
    pub fn memory_budget(&self) -> u64 {
        self.memory_budget
    }
}
