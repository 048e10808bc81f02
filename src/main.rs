use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use osh::config::{Config, ConfigLoader};
use osh::executor::DefaultExecutor;
use osh::repl::Repl;
use tracing_subscriber::EnvFilter;

/// osh - a minimal command interpreter
#[derive(Parser, Debug)]
#[command(name = "osh", version, about)]
struct Args {
    /// Configuration file (key=value lines)
    #[arg(short, long, env = "OSH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("osh: warning: {e}, using defaults");
            Config::default()
        }),
        None => ConfigLoader::default_config(),
    };

    let log_level = if args.debug { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let mut repl = Repl::new(DefaultExecutor::new(), &config);
    let mut input = io::stdin().lock();
    let mut out = io::stdout();

    match repl.run(&mut input, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("osh: {e}");
            ExitCode::FAILURE
        }
    }
}
