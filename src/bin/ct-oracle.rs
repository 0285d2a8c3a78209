//! Command-line front end: evaluate the built-in queue operations.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ct_oracle::output::{format_evaluation, to_json_pretty};
use ct_oracle::{Config, ConstantTimeOracle, DutKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ct-oracle")]
#[command(version)]
#[command(about = "Statistical constant-time checker for queue operations", long_about = None)]
struct Cli {
    /// Enable debug logging (per-round statistics)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered operations
    List,
    /// Check operations for input-dependent timing
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Operations to check (default: all)
    #[arg(value_name = "OP")]
    ops: Vec<DutKind>,

    /// Samples per round
    #[arg(long, value_name = "N")]
    measures: Option<usize>,

    /// Sessions attempted before declaring a leak
    #[arg(long, value_name = "N")]
    tries: Option<usize>,

    /// Unmeasured positions at each end of a round
    #[arg(long, value_name = "N")]
    drop: Option<usize>,

    /// Seed for reproducible class schedules and inputs
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Write every sample as `<class> <delta>` to this file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Install the subscriber; `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config_for(args: &CheckArgs) -> Config {
    let mut config = Config::from_env();
    if let Some(n) = args.measures {
        config.n_measures = n;
    }
    if let Some(n) = args.tries {
        config.test_tries = n;
    }
    if let Some(n) = args.drop {
        config.drop_size = n;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(path) = &args.log {
        config.log_path = Some(path.clone());
    }
    config
}

/// Returns whether every requested operation appears constant time.
fn check(args: &CheckArgs) -> Result<bool> {
    let oracle = ConstantTimeOracle::with_config(config_for(args));
    let ops = if args.ops.is_empty() {
        DutKind::ALL.to_vec()
    } else {
        args.ops.clone()
    };

    let mut all_pass = true;
    for kind in ops {
        let evaluation = oracle
            .evaluate(kind.build())
            .with_context(|| format!("failed to evaluate {kind}"))?;
        all_pass &= evaluation.constant_time;

        if args.json {
            println!("{}", to_json_pretty(&evaluation)?);
        } else {
            println!("{}", format_evaluation(&evaluation));
        }
    }
    Ok(all_pass)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::List => {
            for kind in DutKind::ALL {
                println!("{kind}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => {
            if check(&args)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
