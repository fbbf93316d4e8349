//! CLI bootstrap - builds the provider client for one-shot commands.
//!
//! `serve` wires its own context through `aigate_axum::bootstrap`; this
//! module only covers commands that talk to the provider directly.

use std::sync::Arc;

use aigate_ark::ArkClient;
use aigate_core::{FunctionRegistry, ProviderClient};

use crate::commands::ArkArgs;
use crate::error::CliError;

/// Dependencies for provider-backed commands.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub provider: ProviderClient,
}

/// Build a context from the provider arguments.
///
/// Fails when no API key is configured.
pub fn bootstrap(args: &ArkArgs) -> Result<CliContext, CliError> {
    let client = ArkClient::new(args.client_config())?;
    tracing::debug!(model = %args.model, base_url = %args.base_url, "Ark client ready");
    let provider = ProviderClient::new(Arc::new(FunctionRegistry::builtin()), Arc::new(client));
    Ok(CliContext { provider })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Cli;
    use crate::commands::Commands;
    use clap::Parser;

    fn call_args(extra: &[&str]) -> ArkArgs {
        let argv = ["aigate", "call", "summarize", "text"]
            .into_iter()
            .chain(extra.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Call { ark, .. }) => ark,
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn bootstrap_with_key() {
        let ctx = bootstrap(&call_args(&["--api-key", "k"])).unwrap();
        assert!(ctx.provider.registry().contains("summarize"));
    }

    #[test]
    fn blank_key_is_a_config_error() {
        let err = bootstrap(&call_args(&["--api-key", " "])).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
