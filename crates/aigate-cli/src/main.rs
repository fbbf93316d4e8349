//! CLI entry point - the composition root.

use std::process::ExitCode;

use aigate_cli::{Cli, CliError, Commands, bootstrap, handlers, logging};
use aigate_core::FunctionRegistry;
use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve(args) => {
            let shutdown = CancellationToken::new();
            spawn_ctrl_c_handler(shutdown.clone());
            handlers::serve::execute(args, shutdown).await?;
        }
        Commands::Functions => {
            handlers::functions::execute(&FunctionRegistry::builtin());
        }
        Commands::Call {
            function,
            content,
            stream,
            ark,
        } => {
            let ctx = bootstrap(&ark)?;
            handlers::call::execute(&ctx, &function, &content, stream).await?;
        }
    }

    Ok(())
}

/// Cancel `shutdown` on Ctrl-C.
fn spawn_ctrl_c_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, shutting down");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!("Unable to listen for Ctrl-C: {}", e),
        }
    });
}
