use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};

use crate::{
    barrier::ReadinessBarrier,
    config::Config,
    gateway::{
        InferenceGateway,
        error::GatewayError,
        types::{Decision, FeatureVector},
    },
    notifier::{CutListSubscriber, DispatchNotifier, SubscriptionId},
    store::CutResultStore,
};

/// The one coordination instance per process: owns the inference gateway,
/// the cut result store, the readiness barrier and the dispatch notifier,
/// and is passed explicitly to everything that needs them.
pub struct Coordinator {
    gateway: InferenceGateway,
    store: Arc<CutResultStore>,
    notifier: Arc<DispatchNotifier>,
    barrier: Arc<ReadinessBarrier>,
}

impl Coordinator {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(CutResultStore::new());
        let notifier = Arc::new(DispatchNotifier::new());
        let gateway = InferenceGateway::new(&config.gateway, Arc::clone(&store))
            .context("failed to construct inference gateway")?;
        let barrier = Arc::new(ReadinessBarrier::new(
            config.barrier.expected_agents,
            Duration::from_secs(config.barrier.ready_timeout_secs),
            Arc::clone(&store),
            Arc::clone(&notifier),
        ));

        tracing::info!(
            target: "coordinator",
            endpoint = gateway.endpoint_url(),
            expected_agents = barrier.quorum(),
            ready_timeout_secs = config.barrier.ready_timeout_secs,
            "coordinator_initialized"
        );

        Ok(Self {
            gateway,
            store,
            notifier,
            barrier,
        })
    }

    /// Sends one feature vector to the inference server; cut decisions are
    /// recorded in the store as a side effect before this returns.
    pub async fn analyze(&self, features: &FeatureVector) -> Result<Decision, GatewayError> {
        self.gateway.analyze(features).await
    }

    /// An agent finished its route. Dispatches the cut list once the
    /// configured quorum of distinct agents has checked in, or once the
    /// readiness timeout elapses.
    pub fn register_ready(&self, agent_id: &str) {
        self.barrier.register_ready(agent_id);
    }

    /// Out-of-band dispatch of the current cut list to all subscribers.
    pub fn notify_now(&self) {
        self.barrier.notify_now();
    }

    pub fn cut_results(&self) -> Vec<Decision> {
        self.store.snapshot()
    }

    pub fn cut_result_count(&self) -> usize {
        self.store.count()
    }

    pub fn clear_cut_results(&self) {
        self.store.clear();
    }

    pub fn subscribe(&self, subscriber: Arc<dyn CutListSubscriber>) -> SubscriptionId {
        self.notifier.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}
