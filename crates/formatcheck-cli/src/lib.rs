use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use formatcheck_config::{Config, LoadOptions};
use formatcheck_format::CheckFormat;
use formatcheck_ops::{CheckOptions, CheckOutcome, Operations, ScanOptions};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut load = LoadOptions::default();
    if let Some(path) = cli.config {
        load = load.with_override_path(path);
    }
    let config = Config::load(load)?;
    debug!(
        root = %config.project.root.display(),
        layers = config.sources.layers.len(),
        "configuration loaded"
    );
    let ops = Operations::new(config);

    match cli.command {
        Command::Check(args) => handle_check(&ops, args),
        Command::Options(args) => handle_options(&ops, args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn handle_check(ops: &Operations, args: CheckArgs) -> Result<i32> {
    let CheckArgs {
        path,
        format,
        no_ignore,
    } = args;

    let format = match format.unwrap_or(CheckFormatValue::Plain) {
        CheckFormatValue::Plain => CheckFormat::Plain,
        CheckFormatValue::Json => CheckFormat::Json,
        CheckFormatValue::Diff => CheckFormat::Diff,
    };

    let scan = ScanOptions {
        paths: path,
        respect_ignore: !no_ignore,
    };

    let CheckOutcome {
        rendered,
        exit_code,
        ..
    } = ops.check(CheckOptions { scan, format })?;

    if !rendered.is_empty() {
        emit(&rendered)?;
    }
    Ok(exit_code)
}

fn handle_options(ops: &Operations, args: OptionsArgs) -> Result<i32> {
    let resolved = ops.options_for(&args.file)?;
    let payload = json!({
        "path": resolved.path.to_string_lossy().replace('\\', "/"),
        "language": resolved.language,
        "options": resolved.effective(),
    });
    emit(&serde_json::to_string_pretty(&payload)?)?;
    Ok(0)
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Check source files against formatting conventions",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Use this configuration file on top of the discovered ones
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Report formatting findings
    Check(CheckArgs),
    /// Print the options resolved for a file
    Options(OptionsArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Restrict checking to specific files or directories
    #[arg(long = "path", value_name = "PATH", action = ArgAction::Append)]
    path: Vec<PathBuf>,
    /// Select output format
    #[arg(long, value_enum)]
    format: Option<CheckFormatValue>,
    /// Disable `.gitignore` filtering
    #[arg(long = "no-ignore")]
    no_ignore: bool,
}

#[derive(Args)]
struct OptionsArgs {
    /// File to resolve options for
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckFormatValue {
    Plain,
    Json,
    Diff,
}
