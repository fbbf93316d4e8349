//! Integration tests for the task lifecycle against a fake provider.

use std::sync::Arc;
use std::time::Duration;

use aigate_core::{
    ChatCompletionPort, FunctionRegistry, GatewaySettings, ProviderClient, ProviderEvent,
    ProviderResult, SUMMARIZE, StreamEvent, StreamRelay, Task, TaskId, TaskService, TaskStatus,
};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Answers with the first tenth of the prompt body, after a short delay.
struct Abridger;

#[async_trait]
impl ChatCompletionPort for Abridger {
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let body = prompt.split_once('\n').map_or(prompt, |(_, body)| body);
        let keep = body.chars().count() / 10;
        Ok(body.chars().take(keep.max(1)).collect())
    }

    async fn stream(&self, prompt: &str) -> ProviderResult<mpsc::Receiver<ProviderEvent>> {
        let summary = self.complete(prompt).await?;
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for word in summary.split_inclusive(' ') {
                if tx.send(ProviderEvent::Delta(word.to_string())).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(ProviderEvent::Finished { usage: None }).await;
        });
        Ok(rx)
    }
}

fn client() -> ProviderClient {
    ProviderClient::new(Arc::new(FunctionRegistry::builtin()), Arc::new(Abridger))
}

async fn poll_until_terminal(service: &TaskService, id: &TaskId) -> Task {
    let mut last = TaskStatus::Pending;
    for _ in 0..400 {
        let task = service.get(id).await.expect("task should exist while polling");
        if last != TaskStatus::Pending {
            assert_ne!(task.status, TaskStatus::Pending, "task reverted to pending");
        }
        if task.status.is_terminal() {
            return task;
        }
        last = task.status;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("task did not finish");
}

#[tokio::test]
async fn summarize_long_article_completes_with_shorter_result() {
    let service = TaskService::new(
        client(),
        &GatewaySettings::with_defaults(),
        CancellationToken::new(),
    );
    let article = "The quick brown fox jumps over the lazy dog. ".repeat(50);

    let id = service.submit(SUMMARIZE, &article).await.unwrap();
    let task = poll_until_terminal(&service, &id).await;

    assert_eq!(task.status, TaskStatus::Completed);
    assert!(!task.result.is_empty());
    assert!(task.result.len() < article.len());
    assert_eq!(task.content, article);
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let service = TaskService::new(
        client(),
        &GatewaySettings::with_defaults(),
        CancellationToken::new(),
    );
    assert!(service.get(&TaskId::from("no-such-task")).await.is_none());
}

#[tokio::test]
async fn stream_relay_over_fake_provider() {
    let relay = StreamRelay::new(client(), &GatewaySettings::with_defaults());
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa ".repeat(4);
    let mut rx = relay.open(SUMMARIZE, &text, CancellationToken::new());

    let mut texts = Vec::new();
    let mut tail = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Text(chunk) => {
                assert!(tail.is_empty(), "text after completion");
                texts.push(chunk);
            }
            other => tail.push(other),
        }
    }

    assert!(!texts.is_empty());
    assert_eq!(tail.len(), 3);
    assert_eq!(tail[0], StreamEvent::Completed);
    assert!(matches!(tail[1], StreamEvent::Meta { .. }));
    assert_eq!(tail[2], StreamEvent::Done);
}
