//! Jobs Module
//!
//! Command-line jobs dispatched by name.
//!
//! A job receives a response to fill in, the subcommand it was invoked with,
//! `key=value` options and bare flags, and returns the response.
//!
//! # Jobs
//! - `hello-world`: Responds with a greeting

mod hello_world;
mod registry;

use std::collections::HashMap;

pub use hello_world::HelloWorld;
pub use registry::JobRegistry;

// == Job Response ==
/// Output of a job run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResponse {
    /// Text printed to the caller
    pub body: String,
    /// Process exit code, 0 on success
    pub exit_code: i32,
}

impl JobResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the body and returns the response.
    pub fn set_response(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Replaces the exit code and returns the response.
    pub fn set_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }
}

// == Job Trait ==
/// A named unit of work runnable from the command line.
pub trait Job: Send + Sync {
    /// Name the job is dispatched under.
    fn name(&self) -> &'static str;

    fn run(
        &self,
        response: JobResponse,
        subcommand: &str,
        options: &HashMap<String, String>,
        flags: &[String],
    ) -> JobResponse;
}

/// Parses `key=value` pairs into an options map.
///
/// An entry without `=` maps to an empty value. Later duplicates win.
pub fn parse_options<I, S>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|pair| match pair.as_ref().split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.to_string()),
            None => (pair.as_ref().trim().to_string(), String::new()),
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
