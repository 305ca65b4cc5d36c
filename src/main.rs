//! GitHub Action entry point: trigger a Buddy pipeline run via the `bdy` CLI.
//!
//! The sequence is strictly short-circuiting: ensure the tool is present,
//! gate on credentials, marshal and validate inputs, build and run the
//! command, publish the run URL. Any failure is reported through the runner's
//! error annotation and the process exits non-zero; the core never exits on
//! its own.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod command;
mod credentials;
mod error;
mod github;
mod inputs;
mod install;
mod pipeline;

use cli::Cli;
use error::Error;

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        if let Some(Error::CommandFailed {
            exit_code: Some(code),
            ..
        }) = err.downcast_ref::<Error>()
        {
            tracing::debug!("bdy exited with code {code}");
        }
        github::error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let bdy = install::ensure_installed()?;
    let credentials = credentials::check(&credentials::ProcessEnv)?;
    let inputs = cli.into_inputs()?;

    pipeline::run_pipeline(&bdy, &inputs, &credentials)?;

    // With a wait the tool itself blocks until the run finishes, so there is
    // nothing left to announce.
    if inputs.wait.is_none() {
        info!("Pipeline run initiated successfully");
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
