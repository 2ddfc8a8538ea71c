//! The fluxboot command line tool.

use std::io::IsTerminal;
use std::io::stderr;
use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::Verbosity;
use clap_verbosity_flag::WarnLevel;
use colored::Colorize;
use fluxboot::commands;
use fluxboot::config::Config;
use fluxboot_rm::ManagerError;
use git_testament::git_testament;
use git_testament::render_testament;
use tracing_log::AsTrace;

git_testament!(TESTAMENT);

#[derive(Parser)]
#[command(author, version = render_testament!(TESTAMENT), about, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: commands::bootstrap::BootstrapArgs,

    /// The path to a TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

pub async fn inner() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_log::LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(cli.verbose.log_level_filter().as_trace())
        .with_writer(std::io::stderr)
        .with_ansi(stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => Config::read_config(path)?,
        None => Config::default(),
    };

    commands::bootstrap::bootstrap(cli.args, config).await
}

#[tokio::main]
pub async fn main() {
    if let Err(e) = inner().await {
        eprintln!(
            "{error}: {e:?}",
            error = if std::io::stderr().is_terminal() {
                "error".red().bold()
            } else {
                "error".normal()
            }
        );

        let code = e
            .downcast_ref::<ManagerError>()
            .map(ManagerError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
