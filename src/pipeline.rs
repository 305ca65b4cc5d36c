//! Input validation, `bdy` argument construction, and run-result publication.
//!
//! The argument order is the wire format to `bdy` and must stay stable:
//! subcommand and positional identifier first, then workspace/project, simple
//! pass-through flags, booleans, priority/region, variables, schedule,
//! actions, api override, and wait last (wait makes the run block).

use crate::command;
use crate::credentials::{Credentials, ENDPOINT_VAR, TOKEN_VAR};
use crate::error::{Error, VariableKind};
use crate::github;
use crate::inputs::{parse_list, ListSplit, PipelineInputs, Priority, Region};
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

/// Build the full `bdy` argument vector for one request. Pure and
/// deterministic: the same request always yields the same token sequence.
pub fn build_args(inputs: &PipelineInputs) -> Result<Vec<String>, Error> {
    let mut args = vec![
        "pipeline".to_string(),
        "run".to_string(),
        inputs.identifier.clone(),
        "--workspace".to_string(),
        inputs.workspace.clone(),
        "--project".to_string(),
        inputs.project.clone(),
    ];

    push_present(&mut args, "--comment", inputs.comment.as_deref());
    push_present(&mut args, "--branch", inputs.branch.as_deref());
    push_present(&mut args, "--tag", inputs.tag.as_deref());
    push_present(&mut args, "--revision", inputs.revision.as_deref());
    push_present(&mut args, "--pull-request", inputs.pull_request.as_deref());

    if inputs.refresh {
        args.push("--refresh".to_string());
    }
    if inputs.clear_cache {
        args.push("--clear-cache".to_string());
    }

    if let Some(priority) = inputs.priority.as_deref() {
        let priority = Priority::parse(priority)?;
        args.push("--priority".to_string());
        args.push(priority.as_str().to_string());
    }
    if let Some(region) = inputs.region.as_deref() {
        let region = Region::parse(region)?;
        info!("Overriding region to: {}", region.as_str());
        args.push("--region".to_string());
        args.push(region.as_str().to_string());
    }

    if let Some(variable) = inputs.variable.as_deref() {
        push_variables(&mut args, variable, "--variable", VariableKind::Plain)?;
    }
    if let Some(masked) = inputs.variable_masked.as_deref() {
        push_variables(&mut args, masked, "--variable-masked", VariableKind::Masked)?;
    }

    push_present(&mut args, "--schedule", inputs.schedule.as_deref());

    if let Some(action) = inputs.action.as_deref() {
        for entry in parse_list(action, ListSplit::NewlinesAndCommas) {
            args.push("--action".to_string());
            args.push(entry);
        }
    }

    push_present(&mut args, "--api", inputs.api.as_deref());

    if let Some(wait) = inputs.wait.as_deref() {
        validate_wait(wait)?;
        args.push("--wait".to_string());
        args.push(wait.to_string());
    }

    Ok(args)
}

/// Run the pipeline and publish the resulting run URL, when the tool printed
/// one. A missing URL is not an error.
pub fn run_pipeline(
    bdy: &Path,
    inputs: &PipelineInputs,
    credentials: &Credentials,
) -> Result<Option<String>> {
    info!(
        "Running pipeline: {} in {}/{}{}",
        inputs.identifier,
        inputs.workspace,
        inputs.project,
        reference_info(inputs)
    );

    let args = build_args(inputs)?;
    let env = [
        (TOKEN_VAR, credentials.token.as_str()),
        (ENDPOINT_VAR, credentials.endpoint.as_str()),
    ];
    let stdout = command::execute(bdy, &args, &env)?;

    let run_url = extract_run_url(&stdout);
    if let Some(url) = &run_url {
        github::set_output("run_url", url)?;
        github::export_variable("BUDDY_RUN_URL", url)?;
    }

    Ok(run_url)
}

fn push_present(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn push_variables(
    args: &mut Vec<String>,
    input: &str,
    flag: &str,
    kind: VariableKind,
) -> Result<(), Error> {
    for entry in parse_list(input, ListSplit::Newlines) {
        if !entry.contains(':') {
            return Err(Error::InvalidVariableFormat { kind, entry });
        }
        args.push(flag.to_string());
        args.push(entry);
    }
    Ok(())
}

fn validate_wait(wait: &str) -> Result<(), Error> {
    let seconds: i64 = wait.parse().map_err(|_| Error::InvalidWaitTime {
        value: wait.to_string(),
    })?;
    if seconds < 0 {
        return Err(Error::NegativeWaitTime);
    }
    Ok(())
}

/// ` (on branch 'main', tag 'v1')` clause for the summary log; empty when no
/// ref input is set.
fn reference_info(inputs: &PipelineInputs) -> String {
    let mut refs = Vec::new();
    if let Some(branch) = &inputs.branch {
        refs.push(format!("branch '{branch}'"));
    }
    if let Some(tag) = &inputs.tag {
        refs.push(format!("tag '{tag}'"));
    }
    if let Some(revision) = &inputs.revision {
        refs.push(format!("revision '{revision}'"));
    }
    if let Some(pull_request) = &inputs.pull_request {
        refs.push(format!("pull request '{pull_request}'"));
    }
    if refs.is_empty() {
        String::new()
    } else {
        format!(" (on {})", refs.join(", "))
    }
}

fn extract_run_url(output: &str) -> Option<String> {
    static URL_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        URL_PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("static url pattern"));
    pattern.find(output).map(|m| m.as_str().to_string())
}
