//! Call command handler.
//!
//! Invokes a function once. With `--stream` the answer is printed chunk by
//! chunk as the provider produces it.

use std::io::Write;

use aigate_core::{ProviderEvent, TokenUsage};
use tokio::sync::mpsc;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the call command.
pub async fn execute(
    ctx: &CliContext,
    function: &str,
    content: &str,
    stream: bool,
) -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    if stream {
        let events = ctx.provider.stream(function, content).await?;
        let usage = print_events(events, &mut stdout).await?;
        if let Some(usage) = usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Token usage"
            );
        }
    } else {
        let result = ctx.provider.call(function, content).await?;
        writeln!(stdout, "{result}")?;
    }
    Ok(())
}

/// Write deltas to `out` as they arrive, ending with a newline.
///
/// Returns the usage reported by the provider, if any.
pub async fn print_events<W: Write>(
    mut events: mpsc::Receiver<ProviderEvent>,
    out: &mut W,
) -> Result<Option<TokenUsage>, CliError> {
    let outcome = loop {
        match events.recv().await {
            Some(ProviderEvent::Delta(text)) => {
                write!(out, "{text}")?;
                out.flush()?;
            }
            Some(ProviderEvent::Finished { usage }) => break Ok(usage),
            Some(ProviderEvent::Failed(message)) => break Err(CliError::Provider(message)),
            None => break Ok(None),
        }
    };
    writeln!(out)?;
    outcome
}
