// ABOUTME: Entry point for the scriptgen-release CLI.
// ABOUTME: Builds the run configuration, runs the pipeline, and reports a halt exactly once.

mod cli;

use clap::Parser;
use cli::Cli;
use scriptgen_release::config::{ReleaseSettings, RunConfig};
use scriptgen_release::error::{Error, Result};
use scriptgen_release::operator::{ConsoleOperator, Operator};
use scriptgen_release::pipeline::Pipeline;
use scriptgen_release::release_host::GitHubReleases;
use scriptgen_release::share::NetUseMounter;
use scriptgen_release::types::{DriveLetter, ReleaseVersion};
use secrecy::SecretString;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        match e {
            Error::Step(failure) => eprintln!("Release halted:\n{failure}"),
            other => eprintln!("Error: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = run_config(cli)?;
    let host = GitHubReleases::from_config(&config)?;
    let operator = ConsoleOperator;
    let mounter = NetUseMounter;

    operator.tell(&format!(
        "Releasing script generator {} to {}",
        config.version(),
        config.settings().repository
    ));

    let mut pipeline = Pipeline::new(&config, &operator, &mounter, &host);
    let result = pipeline.run().await;
    operator.tell(&pipeline.report().to_string());

    result.map_err(Error::from)
}

fn run_config(cli: Cli) -> Result<RunConfig> {
    let settings = match cli.config {
        Some(ref path) => ReleaseSettings::load(path)?,
        None => ReleaseSettings::discover(&env::current_dir()?)?,
    };

    let token = cli.token.trim();
    if token.is_empty() {
        return Err(Error::InvalidConfig("token cannot be empty".to_string()));
    }

    Ok(RunConfig::new(
        ReleaseVersion::new(&cli.release_version)?,
        SecretString::from(token.to_owned()),
        DriveLetter::new(&cli.drive)?,
        settings,
    ))
}
