//! Serve command handler.

use aigate_axum::{ServerConfig, start_server};
use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::commands::ServeArgs;

/// Build the server configuration for `args`.
pub fn server_config(args: ServeArgs) -> ServerConfig {
    let gateway = args.gateway_settings();
    let ark = args.ark.client_config();
    ServerConfig {
        host: args.host,
        port: args.port,
        gateway,
        ark,
        ..ServerConfig::with_defaults()
    }
    .with_allowed_origins(args.allowed_origins)
}

/// Run the gateway until `shutdown` fires.
pub async fn execute(args: ServeArgs, shutdown: CancellationToken) -> Result<()> {
    let config = server_config(args);

    println!();
    println!("  aigate gateway starting...");
    println!();
    println!("  API:     http://localhost:{}/api/v1", config.port);
    println!("  Health:  http://localhost:{}/health", config.port);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    start_server(config, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Commands;
    use crate::parser::Cli;
    use aigate_axum::CorsConfig;
    use clap::Parser;

    #[test]
    fn flags_reach_the_server_config() {
        let cli = Cli::try_parse_from([
            "aigate",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "3100",
            "--max-concurrent-streams",
            "2",
        ])
        .unwrap();
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };

        let config = server_config(args);
        assert_eq!(config.addr(), "127.0.0.1:3100");
        assert_eq!(config.gateway.max_concurrent_streams, 2);
        assert!(matches!(config.cors, CorsConfig::AllowAll));
    }
}
