//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, installs logging, opens the configured
//! backend once, and runs a single command. The response envelope goes to
//! stdout; logs go to stderr.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use modelrepo_cli::{Cli, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.persistence_config();
    let ctx = match bootstrap(&config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!(backend = %ctx.backend, "Context ready");

    let output = match handlers::execute(&ctx, cli.command).await {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    println!("{}", output.json);
    if !output.success {
        std::process::exit(output.exit_code());
    }
    Ok(())
}
