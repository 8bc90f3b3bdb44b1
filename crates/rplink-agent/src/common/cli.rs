use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Cli,
    Json,
}

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// Enables more detailed log output
    #[arg(
        long,
        env = "RPAGENT_DEBUG",
        global = true,
        help_heading("GLOBAL OPTIONS")
    )]
    pub debug: bool,
}

// Root CLI options
#[derive(Parser)]
#[command(
    author,
    about,
    version,
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct RootOptions {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    /// Runs the resource provider until it is stopped
    Run(RunOpts),
    /// Validates a provider configuration file and prints the resulting provider
    CheckConfig(CheckConfigOpts),
}

#[derive(Parser)]
pub struct RunOpts {
    /// Path to the TOML provider configuration
    #[arg(long, env = "RPAGENT_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Address of the controller (`host:port`), overrides the configuration file
    #[arg(long, env = "RPAGENT_CONTROLLER")]
    pub controller: Option<String>,

    /// File with a hex encoded secret key shared with the controller,
    /// overrides the configuration file
    #[arg(long, env = "RPAGENT_SECRET_FILE", value_hint = clap::ValueHint::FilePath)]
    pub secret_file: Option<PathBuf>,

    /// How long to wait before reconnecting after the controller connection is lost
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub reconnect_interval: Duration,

    /// Maximum number of reconnects, unlimited when not set
    #[arg(long)]
    pub max_reconnects: Option<u32>,
}

#[derive(Parser)]
pub struct CheckConfigOpts {
    /// Path to the TOML provider configuration
    #[arg(long, env = "RPAGENT_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Sets output formatting
    #[arg(long, default_value_t = OutputMode::Cli, value_enum)]
    pub output_mode: OutputMode,
}
