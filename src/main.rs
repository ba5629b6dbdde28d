use clap::Parser;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tasker::cli;
use tasker::cli::commands::{Cli, Commands};

fn main() {
    dotenvy::dotenv().ok();
    let cli_args = Cli::parse();
    init_tracing(matches!(cli_args.command, Commands::Serve(_)));

    let json_output = cli_args.json;
    let storage = cli_args.storage_config();

    let exit_code = match cli_args.command {
        Commands::Serve(args) => cli::serve::run(&args, &storage),
        Commands::Init => cli::init::run(&storage, json_output),
        Commands::Seed => cli::seed::run(&storage, json_output),
        Commands::Task(cmd) => cli::task::run(cmd, &storage, json_output),
    };

    process::exit(exit_code);
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
/// `RUST_LOG` overrides the default level.
fn init_tracing(serving: bool) {
    let default = if serving {
        "tasker=info,tower_http=info"
    } else {
        "tasker=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
