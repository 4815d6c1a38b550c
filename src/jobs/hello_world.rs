use std::collections::HashMap;

use super::{Job, JobResponse};

/// Responds with `Hello, World!` regardless of arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelloWorld;

impl Job for HelloWorld {
    fn name(&self) -> &'static str {
        "hello-world"
    }

    fn run(
        &self,
        response: JobResponse,
        _subcommand: &str,
        _options: &HashMap<String, String>,
        _flags: &[String],
    ) -> JobResponse {
        response.set_response("Hello, World!")
    }
}
