use std::{
    fmt,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::gateway::types::Decision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyErrorKind {
    HandlerFailed,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError {
    pub kind: NotifyErrorKind,
    pub message: String,
}

impl NotifyError {
    pub fn new(kind: NotifyErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NotifyError {}

pub fn handler_failed(message: impl Into<String>) -> NotifyError {
    NotifyError::new(NotifyErrorKind::HandlerFailed, message)
}

/// Consumer of cut-list dispatches. Delivery is synchronous; implementations
/// must not block for long.
pub trait CutListSubscriber: Send + Sync {
    fn name(&self) -> &str;

    fn on_cut_results(&self, cuts: &[Decision]) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Multicast publish point for cut-list snapshots. Subscribers are invoked
/// in subscription order with the same snapshot; a failing subscriber is
/// logged and never stops delivery to the rest.
#[derive(Default)]
pub struct DispatchNotifier {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(SubscriptionId, Arc<dyn CutListSubscriber>)>>,
}

impl DispatchNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn CutListSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self.subscribers.write().expect("lock poisoned");
        subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().expect("lock poisoned");
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("lock poisoned").len()
    }

    pub fn publish(&self, cuts: &[Decision]) {
        let subscribers: Vec<(SubscriptionId, Arc<dyn CutListSubscriber>)> = self
            .subscribers
            .read()
            .expect("lock poisoned")
            .clone();

        tracing::debug!(
            target: "notifier",
            cuts = cuts.len(),
            subscribers = subscribers.len(),
            "cut_results_publish"
        );

        for (id, subscriber) in subscribers {
            if let Err(err) = subscriber.on_cut_results(cuts) {
                tracing::warn!(
                    target: "notifier",
                    subscriber = subscriber.name(),
                    subscription_id = ?id,
                    error = %err,
                    "subscriber_failed"
                );
            }
        }
    }
}

/// Logs every dispatched cut list, one numbered line per entry. The default
/// subscriber installed by the binary.
pub struct CutLogConsumer;

impl CutListSubscriber for CutLogConsumer {
    fn name(&self) -> &str {
        "cut-log-consumer"
    }

    fn on_cut_results(&self, cuts: &[Decision]) -> Result<(), NotifyError> {
        if cuts.is_empty() {
            tracing::info!(target: "consumer", "no cut results available");
            return Ok(());
        }

        let mut rendered = String::from("current cut results:\n");
        for (index, cut) in cuts.iter().enumerate() {
            rendered.push_str(&format!(
                "[{}] coord: ({},{}) | decision: {} | prob: {:.2}\n",
                index + 1,
                cut.x_coordinate,
                cut.y_coordinate,
                cut.cut_decision.as_wire_str(),
                cut.probability
            ));
        }
        tracing::info!(target: "consumer", total = cuts.len(), "{}", rendered.trim_end());
        Ok(())
    }
}
