//! Command-line surface and input marshalling.
//!
//! Inside a runner every value arrives as an `INPUT_*` environment variable;
//! the flags exist so the binary can be exercised directly. A flag always
//! wins over the corresponding input.

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::github;
use crate::inputs::PipelineInputs;

#[derive(Parser, Debug)]
#[command(
    name = "buddy-pipeline-run",
    version,
    about = "Trigger a Buddy pipeline run via the bdy CLI"
)]
pub struct Cli {
    /// Buddy workspace the pipeline lives in
    #[arg(long)]
    workspace: Option<String>,

    /// Buddy project the pipeline lives in
    #[arg(long)]
    project: Option<String>,

    /// Pipeline identifier to run
    #[arg(long)]
    identifier: Option<String>,

    /// Comment attached to the run
    #[arg(long)]
    comment: Option<String>,

    /// Seconds to block waiting for the run to finish
    #[arg(long)]
    wait: Option<String>,

    /// Branch to run against
    #[arg(long)]
    branch: Option<String>,

    /// Tag to run against
    #[arg(long)]
    tag: Option<String>,

    /// Revision to run against
    #[arg(long)]
    revision: Option<String>,

    /// Pull request to run against
    #[arg(long)]
    pull_request: Option<String>,

    /// Refresh an existing run instead of starting a new one
    #[arg(long)]
    refresh: bool,

    /// Clear pipeline caches before the run
    #[arg(long)]
    clear_cache: bool,

    /// Run priority: LOW, NORMAL, or HIGH
    #[arg(long)]
    priority: Option<String>,

    /// Region override: EU, US, or AP
    #[arg(long)]
    region: Option<String>,

    /// key:value variables, one per line
    #[arg(long)]
    variable: Option<String>,

    /// key:value masked variables, one per line
    #[arg(long)]
    variable_masked: Option<String>,

    /// Schedule the run instead of starting it now
    #[arg(long)]
    schedule: Option<String>,

    /// Actions to limit the run to, newline- or comma-separated
    #[arg(long)]
    action: Option<String>,

    /// Custom Buddy API endpoint
    #[arg(long)]
    api: Option<String>,
}

impl Cli {
    /// Marshal flags and `INPUT_*` variables into one immutable request.
    pub fn into_inputs(self) -> Result<PipelineInputs> {
        Ok(PipelineInputs {
            workspace: required(self.workspace, "workspace")?,
            project: required(self.project, "project")?,
            identifier: required(self.identifier, "identifier")?,
            comment: optional(self.comment, "comment"),
            wait: optional(self.wait, "wait"),
            branch: optional(self.branch, "branch"),
            tag: optional(self.tag, "tag"),
            revision: optional(self.revision, "revision"),
            pull_request: optional(self.pull_request, "pull-request"),
            refresh: self.refresh || github::get_bool_input("refresh"),
            clear_cache: self.clear_cache || github::get_bool_input("clear-cache"),
            priority: optional(self.priority, "priority"),
            region: optional(self.region, "region"),
            variable: optional(self.variable, "variable"),
            variable_masked: optional(self.variable_masked, "variable-masked"),
            schedule: optional(self.schedule, "schedule"),
            action: optional(self.action, "action"),
            api: optional(self.api, "api"),
        })
    }
}

fn optional(flag: Option<String>, input: &str) -> Option<String> {
    flag.or_else(|| github::get_input(input))
}

fn required(flag: Option<String>, input: &str) -> Result<String> {
    optional(flag, input).ok_or_else(|| anyhow!("Input required and not supplied: {input}"))
}
