//! GitHub Actions runner surface: action inputs, step outputs, and workflow
//! commands.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables, outputs leave
//! through the files named by `GITHUB_OUTPUT` / `GITHUB_ENV`, and everything
//! else (secret masking, failure reporting) is a `::command::` line on stdout.

use anyhow::{Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Read an action input, trimmed; an unset or empty input is `None`.
///
/// The runner upper-cases input names and replaces spaces with underscores
/// when building the env var; dashes are kept as-is.
pub fn get_input(name: &str) -> Option<String> {
    let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Boolean inputs are the literal string `true`; anything else is false.
pub fn get_bool_input(name: &str) -> bool {
    get_input(name).is_some_and(|value| value == "true")
}

/// Publish a step output for downstream steps.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    append_to_command_file("GITHUB_OUTPUT", name, value)
}

/// Export an environment variable to later steps in the job.
pub fn export_variable(name: &str, value: &str) -> Result<()> {
    append_to_command_file("GITHUB_ENV", name, value)
}

/// Register a secret with the runner's log redaction. Global and idempotent.
pub fn add_mask(secret: &str) {
    println!("::add-mask::{}", escape_data(secret));
}

/// Report a failure through the runner's error annotation.
pub fn error(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn append_to_command_file(file_var: &str, name: &str, value: &str) -> Result<()> {
    let Some(path) = env::var_os(file_var) else {
        // Outside a runner there is nowhere to publish; keep local runs usable.
        tracing::debug!("{file_var} is not set, skipping {name}={value}");
        return Ok(());
    };
    append_entry(Path::new(&path), name, value)
        .with_context(|| format!("append {name} to {file_var} file"))
}

fn append_entry(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    writeln!(file, "{name}={value}")?;
    Ok(())
}

/// Workflow commands are single lines; the runner decodes `%0A` et al. back.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
