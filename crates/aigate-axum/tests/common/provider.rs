//! Fake chat completion provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use aigate_core::{ChatCompletionPort, ProviderError, ProviderEvent, ProviderResult, TokenUsage};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// How the fake answers.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Summaries keep a tenth of the input, translations of "你好" answer
    /// "Hello", and streams split the answer into words.
    Normal,
    /// Every request fails before any output.
    Reject(ProviderError),
    /// Streams emit `partial` then fail with the message.
    BreakMidStream(String),
    /// Streams emit a tick every few milliseconds until nobody listens.
    Endless,
}

#[derive(Debug, Clone)]
pub struct FakeProvider {
    behaviour: Behaviour,
    upstream_closed: Arc<AtomicBool>,
}

impl FakeProvider {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            upstream_closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn normal() -> Self {
        Self::new(Behaviour::Normal)
    }

    /// Set once an endless stream notices its consumer is gone.
    pub fn upstream_closed(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.upstream_closed)
    }

    fn answer(prompt: &str) -> String {
        let (instruction, body) = prompt.split_once('\n').unwrap_or(("", prompt));
        if instruction.contains("总结") {
            let keep = (body.chars().count() / 10).max(1);
            body.chars().take(keep).collect()
        } else if body == "你好" {
            "Hello".to_string()
        } else {
            format!("echo: {body}")
        }
    }
}

#[async_trait]
impl ChatCompletionPort for FakeProvider {
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        match &self.behaviour {
            Behaviour::Reject(err) => Err(err.clone()),
            _ => Ok(Self::answer(prompt)),
        }
    }

    async fn stream(&self, prompt: &str) -> ProviderResult<mpsc::Receiver<ProviderEvent>> {
        let (tx, rx) = mpsc::channel(8);
        match &self.behaviour {
            Behaviour::Reject(err) => return Err(err.clone()),
            Behaviour::Normal => {
                let answer = Self::answer(prompt);
                tokio::spawn(async move {
                    for word in answer.split_inclusive(' ') {
                        if tx.send(ProviderEvent::Delta(word.to_string())).await.is_err() {
                            return;
                        }
                    }
                    let usage = TokenUsage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                        total_tokens: 15,
                    };
                    let _ = tx.send(ProviderEvent::Finished { usage: Some(usage) }).await;
                });
            }
            Behaviour::BreakMidStream(message) => {
                let message = message.clone();
                tokio::spawn(async move {
                    let _ = tx.send(ProviderEvent::Delta("partial".into())).await;
                    let _ = tx.send(ProviderEvent::Failed(message)).await;
                });
            }
            Behaviour::Endless => {
                let closed = Arc::clone(&self.upstream_closed);
                tokio::spawn(async move {
                    while tx.send(ProviderEvent::Delta("tick ".into())).await.is_ok() {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                    closed.store(true, Ordering::SeqCst);
                });
            }
        }
        Ok(rx)
    }
}
