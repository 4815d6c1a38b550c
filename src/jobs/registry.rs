//! Job Registry
//!
//! Maps job names to handlers and dispatches invocations.

use std::collections::BTreeMap;
use std::collections::HashMap;

use tracing::{debug, info};

use super::{HelloWorld, Job, JobResponse};
use crate::error::{AppError, Result};

// == Job Registry ==
/// Named job handlers.
#[derive(Default)]
pub struct JobRegistry {
    jobs: BTreeMap<&'static str, Box<dyn Job>>,
}

impl JobRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in jobs.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HelloWorld);
        registry
    }

    /// Registers `job` under its name, replacing any job with the same name.
    pub fn register(&mut self, job: impl Job + 'static) {
        let name = job.name();
        if self.jobs.insert(name, Box::new(job)).is_some() {
            debug!(job = name, "Replaced registered job");
        }
    }

    /// Registered job names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.jobs.keys().copied().collect()
    }

    /// Runs the job registered as `name`.
    pub fn dispatch(
        &self,
        name: &str,
        subcommand: &str,
        options: &HashMap<String, String>,
        flags: &[String],
    ) -> Result<JobResponse> {
        let job = self
            .jobs
            .get(name)
            .ok_or_else(|| AppError::UnknownJob(name.to_string()))?;

        info!(job = name, subcommand, "Running job");
        let response = job.run(JobResponse::new(), subcommand, options, flags);
        debug!(job = name, exit_code = response.exit_code, "Job finished");

        Ok(response)
    }
}
