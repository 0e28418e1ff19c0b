//! The event-queue consumer stub (spec SPEC_FULL.md §6.2), grounded in the
//! teacher's `agent_core::streams::webhook_channel`: a channel plus a
//! trait, nothing more. Whatever sits upstream (Kafka, SQS, a webhook)
//! only needs to produce events onto an `EventSource`; it never touches
//! `rete-net` or `rule-cache` directly, matching the redesign flag that
//! the queue worker interacts with the core solely through
//! `RuleEngine::evaluate`.

use tokio::sync::mpsc::{self, Receiver, Sender};

/// A source of events to run through the engine. Conceptually the async
/// analogue of a `Stream<Item = serde_json::Value>`; kept as a minimal
/// polling method rather than pulling in a `Stream` combinator crate the
/// rest of the workspace has no other use for.
#[async_trait::async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> Option<serde_json::Value>;
}

pub struct ChannelEventSource {
    rx: Receiver<serde_json::Value>,
}

#[async_trait::async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<serde_json::Value> {
        self.rx.recv().await
    }
}

/// Mirrors `webhook_channel`'s `(Sender, Receiver)` shape, but over
/// `tokio::sync::mpsc` since consumers run inside the async runtime the
/// HTTP veneer already owns.
pub fn event_channel(buffer: usize) -> (Sender<serde_json::Value>, ChannelEventSource) {
    let (tx, rx) = mpsc::channel(buffer);
    (tx, ChannelEventSource { rx })
}

/// Drains an `EventSource` into the engine until the source closes.
/// Errors from a single event's evaluation are logged and do not stop the
/// loop — one malformed event must not wedge the consumer.
pub async fn run_consumer(
    mut source: impl EventSource,
    engine: std::sync::Arc<rule_engine::RuleEngine>,
) {
    while let Some(event) = source.next_event().await {
        let options = rule_engine::EvaluateOptions::default();
        match engine.evaluate(&event, options) {
            Ok(report) => {
                tracing::debug!(matched = report.matched_rules.len(), "event evaluated");
            }
            Err(error) => {
                tracing::warn!(%error, "event evaluation failed");
            }
        }
    }
    tracing::info!("event source closed, consumer loop exiting");
}
