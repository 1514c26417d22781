use std::{sync::Arc, time::Duration};

use reqwest::Client;
use uuid::Uuid;

use crate::{
    config::GatewayConfig,
    gateway::{
        error::{GatewayError, configuration_error, internal_error, parse_error, transport_error},
        types::{Decision, FeatureVector},
    },
    store::CutResultStore,
};

/// Client for the remote cut-decision model. Each `analyze` call is one POST
/// with a bounded timeout; calls are independent and may overlap freely.
/// Decisions that mark a plant for cutting are appended to the shared store
/// before the caller sees them.
#[derive(Debug)]
pub struct InferenceGateway {
    client: Client,
    endpoint_url: String,
    timeout: Duration,
    store: Arc<CutResultStore>,
}

impl InferenceGateway {
    pub fn new(config: &GatewayConfig, store: Arc<CutResultStore>) -> Result<Self, GatewayError> {
        if config.base_url.trim().is_empty() {
            return Err(configuration_error("gateway.base_url cannot be empty"));
        }
        if !config.endpoint_path.starts_with('/') {
            return Err(configuration_error(format!(
                "gateway.endpoint_path must start with '/', got '{}'",
                config.endpoint_path
            )));
        }
        if config.timeout_secs == 0 {
            return Err(configuration_error("gateway.timeout_secs must be at least 1"));
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| internal_error(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            endpoint_url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                config.endpoint_path
            ),
            timeout: Duration::from_secs(config.timeout_secs),
            store,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Sends one feature vector to the inference server and returns its
    /// decision. Exactly one of `Ok`/`Err` per call, no automatic retry.
    pub async fn analyze(&self, features: &FeatureVector) -> Result<Decision, GatewayError> {
        let request_id = Uuid::now_v7().to_string();
        tracing::debug!(
            target: "gateway",
            request_id = %request_id,
            url = %self.endpoint_url,
            x = features.x_coordinate,
            y = features.y_coordinate,
            timeout_ms = self.timeout.as_millis() as u64,
            "analyze_request_start"
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(features)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                let message = if err.is_timeout() {
                    format!(
                        "request to {} timed out after {}s",
                        self.endpoint_url,
                        self.timeout.as_secs()
                    )
                } else {
                    format!("request to {} failed: {err}", self.endpoint_url)
                };
                tracing::warn!(
                    target: "gateway",
                    request_id = %request_id,
                    error = %message,
                    "analyze_transport_failed"
                );
                transport_error(message)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(format!("failed to read response body: {err}")))?;

        if !status.is_success() {
            tracing::warn!(
                target: "gateway",
                request_id = %request_id,
                http_status = status.as_u16(),
                body = %body,
                "analyze_http_error"
            );
            return Err(transport_error(format!(
                "HTTP {}: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("request failed"),
                body
            ))
            .with_http_status(status.as_u16()));
        }

        let decision: Decision = serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(
                target: "gateway",
                request_id = %request_id,
                error = %err,
                body = %body,
                "analyze_parse_failed"
            );
            parse_error(format!("failed to parse decision response: {err}"))
        })?;

        if decision.cut_decision.requires_cut() {
            self.store.append(decision.clone());
            tracing::info!(
                target: "gateway",
                request_id = %request_id,
                x = decision.x_coordinate,
                y = decision.y_coordinate,
                decision = decision.cut_decision.as_wire_str(),
                probability = decision.probability,
                total_cuts = self.store.count(),
                "cut_recorded"
            );
        } else {
            tracing::debug!(
                target: "gateway",
                request_id = %request_id,
                x = decision.x_coordinate,
                y = decision.y_coordinate,
                probability = decision.probability,
                "no_cut_decision"
            );
        }

        Ok(decision)
    }
}
