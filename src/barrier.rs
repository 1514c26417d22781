use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::JoinHandle;

use crate::{notifier::DispatchNotifier, store::CutResultStore};

const UNNAMED_AGENT_ID: &str = "unnamed-agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchReason {
    Quorum,
    Timeout,
    Manual,
}

impl DispatchReason {
    fn as_str(&self) -> &'static str {
        match self {
            DispatchReason::Quorum => "quorum",
            DispatchReason::Timeout => "timeout",
            DispatchReason::Manual => "manual",
        }
    }
}

struct BarrierState {
    epoch: u64,
    // Incremented whenever the deadline timer is started, superseded or
    // cancelled. A timer callback whose captured sequence no longer matches
    // is stale and must not dispatch.
    timer_seq: u64,
    ready: HashSet<String>,
    timer: Option<JoinHandle<()>>,
}

/// Quorum-with-timeout barrier over scout-agent readiness.
///
/// Each distinct agent id counts once toward the quorum; every registration
/// restarts the single deadline timer. The cut list is dispatched exactly
/// once per epoch, either when the quorum is reached (checked synchronously
/// inside `register_ready`, so it always wins a race against the timer) or
/// when the deadline elapses, after which the agent set is cleared and a new
/// epoch begins.
pub struct ReadinessBarrier {
    quorum: usize,
    timeout: Duration,
    store: Arc<CutResultStore>,
    notifier: Arc<DispatchNotifier>,
    state: Mutex<BarrierState>,
}

impl ReadinessBarrier {
    pub fn new(
        quorum: usize,
        timeout: Duration,
        store: Arc<CutResultStore>,
        notifier: Arc<DispatchNotifier>,
    ) -> Self {
        Self {
            quorum: quorum.max(1),
            timeout,
            store,
            notifier,
            state: Mutex::new(BarrierState {
                epoch: 0,
                timer_seq: 0,
                ready: HashSet::new(),
                timer: None,
            }),
        }
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    pub fn epoch(&self) -> u64 {
        self.state.lock().expect("lock poisoned").epoch
    }

    pub fn ready_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").ready.len()
    }

    /// Records that an agent finished its route. Re-registration of the same
    /// id does not count twice but still refreshes the deadline.
    pub fn register_ready(self: &Arc<Self>, agent_id: &str) {
        let agent = if agent_id.trim().is_empty() {
            UNNAMED_AGENT_ID
        } else {
            agent_id
        };

        let dispatch = {
            let mut state = self.state.lock().expect("lock poisoned");
            let newly_ready = state.ready.insert(agent.to_string());
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.timer_seq += 1;

            tracing::debug!(
                target: "barrier",
                agent = agent,
                newly_ready,
                ready = state.ready.len(),
                quorum = self.quorum,
                epoch = state.epoch,
                "agent_ready"
            );

            if state.ready.len() >= self.quorum {
                state.ready.clear();
                state.epoch += 1;
                true
            } else {
                let seq = state.timer_seq;
                let barrier = Arc::clone(self);
                state.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(barrier.timeout).await;
                    barrier.on_deadline(seq);
                }));
                false
            }
        };

        if dispatch {
            self.dispatch(DispatchReason::Quorum);
        }
    }

    fn on_deadline(&self, seq: u64) {
        let dispatch = {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.timer_seq != seq {
                // Superseded by a later registration or already dispatched.
                return;
            }
            tracing::info!(
                target: "barrier",
                ready = state.ready.len(),
                quorum = self.quorum,
                epoch = state.epoch,
                timeout_ms = self.timeout.as_millis() as u64,
                "readiness_deadline_elapsed"
            );
            state.ready.clear();
            state.timer = None;
            state.timer_seq += 1;
            state.epoch += 1;
            true
        };

        if dispatch {
            self.dispatch(DispatchReason::Timeout);
        }
    }

    /// Out-of-band delivery of the current cut list. Leaves the agent set,
    /// timer and epoch untouched.
    pub fn notify_now(&self) {
        self.dispatch(DispatchReason::Manual);
    }

    fn dispatch(&self, reason: DispatchReason) {
        let cuts = self.store.snapshot();
        tracing::info!(
            target: "barrier",
            reason = reason.as_str(),
            cuts = cuts.len(),
            "cut_results_dispatch"
        );
        self.notifier.publish(&cuts);
    }
}
