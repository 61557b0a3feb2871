// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One command: release a version, with token, drive and settings options.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scriptgen-release")]
#[command(about = "Package and publish a script generator release, one confirmed step at a time")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// The script generator version to create a release of
    #[arg(short = 'v', long = "version", value_name = "VERSION")]
    pub release_version: String,

    /// GitHub token used for every release API call
    #[arg(
        short,
        long,
        env = "SCRIPTGEN_RELEASE_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub token: String,

    /// The drive to mount the share to
    #[arg(short, long, default_value = "Z:")]
    pub drive: String,

    /// Settings file (defaults to release.yml in the current directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}
