//! Stream relay - pumps provider events into client-visible stream events.
//!
//! One relay unit runs per stream request. It owns the provider receiver and
//! the outbound sender, and stops as soon as the consumer goes away.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{ProviderEvent, StreamEvent, TokenUsage};
use crate::settings::GatewaySettings;

use super::ProviderClient;

/// Opens stream relays with bounded concurrency.
#[derive(Debug, Clone)]
pub struct StreamRelay {
    client: ProviderClient,
    permits: Arc<Semaphore>,
    buffer: usize,
}

impl StreamRelay {
    pub fn new(client: ProviderClient, settings: &GatewaySettings) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(settings.max_concurrent_streams)),
            buffer: settings.stream_buffer.max(2),
        }
    }

    /// Start relaying `function` over `content`.
    ///
    /// The returned receiver yields text events in provider order, then
    /// either the completion marker and meta event or one error event, and
    /// finally [`StreamEvent::Done`]. Dropping the receiver or firing
    /// `cancel` stops the relay without emitting anything further.
    pub fn open(
        &self,
        function: &str,
        content: &str,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(self.buffer);
        tokio::spawn(pump(
            self.client.clone(),
            Arc::clone(&self.permits),
            function.to_string(),
            content.to_string(),
            cancel,
            tx,
        ));
        rx
    }
}

/// Outbound side of one relay.
struct Outbound {
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
}

impl Outbound {
    /// Send one event. Returns `false` once the consumer is gone.
    async fn send(&self, event: StreamEvent) -> bool {
        tokio::select! {
            () = self.cancel.cancelled() => false,
            sent = self.tx.send(event) => sent.is_ok(),
        }
    }

    /// Resolves once the client cancels or drops the receiver.
    async fn gone(&self) {
        tokio::select! {
            () = self.cancel.cancelled() => {}
            () = self.tx.closed() => {}
        }
    }

    async fn fail(&self, message: String) {
        if self.send(StreamEvent::Error(message)).await {
            self.send(StreamEvent::Done).await;
        }
    }

    async fn complete(&self, usage: TokenUsage) {
        let closing = [
            StreamEvent::Completed,
            StreamEvent::Meta {
                message_id: Uuid::new_v4().to_string(),
                usage,
            },
            StreamEvent::Done,
        ];
        for event in closing {
            if !self.send(event).await {
                return;
            }
        }
    }
}

async fn pump(
    client: ProviderClient,
    permits: Arc<Semaphore>,
    function: String,
    content: String,
    cancel: CancellationToken,
    tx: mpsc::Sender<StreamEvent>,
) {
    let out = Outbound { tx, cancel };

    if let Err(e) = client.validate(&function, &content) {
        tracing::debug!(function = %function, error = %e, "Rejected stream request");
        out.fail(e.to_string()).await;
        return;
    }

    let permit = tokio::select! {
        () = out.gone() => return,
        permit = permits.acquire_owned() => permit,
    };
    let Ok(_permit) = permit else {
        out.fail("Stream relay is closed".to_string()).await;
        return;
    };

    let opened = tokio::select! {
        () = out.gone() => return,
        opened = client.stream(&function, &content) => opened,
    };
    let mut events = match opened {
        Ok(events) => events,
        Err(e) => {
            out.fail(e.to_string()).await;
            return;
        }
    };

    tracing::debug!(function = %function, "Stream relay open");
    let mut chunks = 0usize;

    loop {
        let event = tokio::select! {
            () = out.gone() => {
                tracing::debug!(function = %function, chunks, "Stream consumer gone");
                return;
            }
            event = events.recv() => event,
        };

        match event {
            Some(ProviderEvent::Delta(text)) => {
                chunks += 1;
                if !out.send(StreamEvent::Text(text)).await {
                    tracing::debug!(function = %function, chunks, "Stream consumer closed");
                    return;
                }
            }
            Some(ProviderEvent::Finished { usage }) => {
                tracing::debug!(function = %function, chunks, "Stream finished");
                out.complete(usage.unwrap_or_default()).await;
                return;
            }
            None => {
                tracing::debug!(function = %function, chunks, "Provider stream closed");
                out.complete(TokenUsage::default()).await;
                return;
            }
            Some(ProviderEvent::Failed(message)) => {
                tracing::warn!(function = %function, error = %message, "Provider stream failed");
                out.fail(message).await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FunctionRegistry, SUMMARIZE, TRANSLATE_ZH_TO_EN};
    use crate::ports::{MockChatCompletionPort, ProviderError};
    use std::sync::Mutex;
    use std::time::Duration;

    fn relay(port: MockChatCompletionPort) -> StreamRelay {
        let client = ProviderClient::new(Arc::new(FunctionRegistry::builtin()), Arc::new(port));
        StreamRelay::new(client, &GatewaySettings::with_defaults())
    }

    /// A provider that replays a fixed script and then closes.
    fn scripted(events: Vec<ProviderEvent>) -> MockChatCompletionPort {
        let mut port = MockChatCompletionPort::new();
        port.expect_stream().times(1).returning(move |_| {
            let (tx, rx) = mpsc::channel(events.len().max(1));
            for event in events.clone() {
                tx.try_send(event).unwrap();
            }
            Ok(rx)
        });
        port
    }

    /// A provider whose sender is driven by the test.
    fn manual() -> (MockChatCompletionPort, mpsc::Sender<ProviderEvent>) {
        let (tx, rx) = mpsc::channel(4);
        let slot = Mutex::new(Some(rx));
        let mut port = MockChatCompletionPort::new();
        port.expect_stream()
            .times(1)
            .returning(move |_| Ok(slot.lock().unwrap().take().unwrap()));
        (port, tx)
    }

    async fn collect(mut rx: mpsc::Receiver<StreamEvent>) -> Vec<StreamEvent> {
        let mut out = Vec::new();
        while let Some(event) = rx.recv().await {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn relays_chunks_in_order_then_closes() {
        let usage = TokenUsage {
            prompt_tokens: 5,
            completion_tokens: 3,
            total_tokens: 8,
        };
        let port = scripted(vec![
            ProviderEvent::Delta("Hel".into()),
            ProviderEvent::Delta("lo, ".into()),
            ProviderEvent::Delta("世界".into()),
            ProviderEvent::Finished { usage: Some(usage) },
        ]);

        let rx = relay(port).open(TRANSLATE_ZH_TO_EN, "你好世界", CancellationToken::new());
        let events = collect(rx).await;

        assert_eq!(events.len(), 6);
        assert_eq!(events[0], StreamEvent::Text("Hel".into()));
        assert_eq!(events[1], StreamEvent::Text("lo, ".into()));
        assert_eq!(events[2], StreamEvent::Text("世界".into()));
        assert_eq!(events[3], StreamEvent::Completed);
        match &events[4] {
            StreamEvent::Meta { message_id, usage: got } => {
                assert_eq!(message_id.len(), 36);
                assert_eq!(*got, usage);
            }
            other => panic!("expected meta, got {other:?}"),
        }
        assert!(events[5].is_done());
    }

    #[tokio::test]
    async fn closed_provider_channel_counts_as_finish() {
        let port = scripted(vec![ProviderEvent::Delta("only".into())]);
        let events = collect(relay(port).open(SUMMARIZE, "text", CancellationToken::new())).await;

        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[2],
            StreamEvent::Meta { usage, .. } if usage == TokenUsage::default()
        ));
    }

    #[tokio::test]
    async fn unsupported_function_yields_error_then_done() {
        let mut port = MockChatCompletionPort::new();
        port.expect_stream().never();

        let rx = relay(port).open("translate_xx", "text", CancellationToken::new());
        let events = collect(rx).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], StreamEvent::Error(msg) if msg.contains("translate_xx")));
        assert_eq!(events[1], StreamEvent::Done);
    }

    #[tokio::test]
    async fn mid_stream_failure_yields_one_error() {
        let port = scripted(vec![
            ProviderEvent::Delta("partial".into()),
            ProviderEvent::Failed("connection reset".into()),
            ProviderEvent::Delta("ignored".into()),
        ]);

        let events = collect(relay(port).open(SUMMARIZE, "text", CancellationToken::new())).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Text("partial".into()),
                StreamEvent::Error("connection reset".into()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn open_failure_yields_error_then_done() {
        let mut port = MockChatCompletionPort::new();
        port.expect_stream().returning(|_| {
            Err(ProviderError::Api {
                status: 401,
                message: "bad key".into(),
            })
        });

        let events = collect(relay(port).open(SUMMARIZE, "text", CancellationToken::new())).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], StreamEvent::Error(msg) if msg.contains("bad key")));
        assert!(events[1].is_done());
    }

    #[tokio::test]
    async fn consumer_drop_stops_the_relay() {
        let (port, provider) = manual();
        let mut rx = relay(port).open(SUMMARIZE, "text", CancellationToken::new());

        provider.send(ProviderEvent::Delta("a".into())).await.unwrap();
        assert_eq!(rx.recv().await, Some(StreamEvent::Text("a".into())));
        drop(rx);

        // The relay drops its provider receiver once a send fails.
        let _ = provider.send(ProviderEvent::Delta("b".into())).await;
        tokio::time::timeout(Duration::from_secs(1), provider.closed())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn dropping_an_idle_receiver_frees_the_slot() {
        let (port, provider) = manual();
        let client = ProviderClient::new(Arc::new(FunctionRegistry::builtin()), Arc::new(port));
        let settings = GatewaySettings::with_defaults().with_max_concurrent_streams(1);
        let relay = StreamRelay::new(client, &settings);

        let mut rx = relay.open(SUMMARIZE, "text", CancellationToken::new());
        provider.send(ProviderEvent::Delta("a".into())).await.unwrap();
        assert_eq!(rx.recv().await, Some(StreamEvent::Text("a".into())));
        assert_eq!(relay.permits.available_permits(), 0);

        // The provider stays silent from here on; only the consumer leaves.
        drop(rx);
        tokio::time::timeout(Duration::from_secs(1), provider.closed())
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), async {
            while relay.permits.available_permits() != 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn cancellation_emits_nothing_more() {
        let (port, provider) = manual();
        let cancel = CancellationToken::new();
        let mut rx = relay(port).open(SUMMARIZE, "text", cancel.clone());

        provider.send(ProviderEvent::Delta("a".into())).await.unwrap();
        assert_eq!(rx.recv().await, Some(StreamEvent::Text("a".into())));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), provider.closed())
            .await
            .unwrap();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn streams_wait_for_a_free_slot() {
        let (port, provider) = manual();
        let client = ProviderClient::new(Arc::new(FunctionRegistry::builtin()), Arc::new(port));
        let settings = GatewaySettings::with_defaults().with_max_concurrent_streams(1);
        let relay = StreamRelay::new(client, &settings);

        let first = relay.open(SUMMARIZE, "one", CancellationToken::new());
        provider.send(ProviderEvent::Delta("x".into())).await.unwrap();

        // The second relay is rejected by the registry, not the semaphore,
        // so it finishes even while the only slot is held.
        let rejected = collect(relay.open("nope", "two", CancellationToken::new())).await;
        assert_eq!(rejected.len(), 2);

        let waiting_cancel = CancellationToken::new();
        let mut waiting = relay.open(SUMMARIZE, "three", waiting_cancel.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(waiting.try_recv().is_err());
        assert_eq!(relay.permits.available_permits(), 0);

        waiting_cancel.cancel();
        assert_eq!(waiting.recv().await, None);

        drop(provider);
        assert_eq!(collect(first).await.len(), 4);
    }
}
