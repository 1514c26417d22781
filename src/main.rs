use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};

use harvestd::{
    cli::options_from_env,
    config::Config,
    coordinator::Coordinator,
    gateway::types::FeatureVector,
    ingress::run_stdin_ingress,
    logging::init_tracing,
    notifier::CutLogConsumer,
};

#[tokio::main]
async fn main() -> Result<()> {
    let options = options_from_env()?;
    let config = if options.config_path.exists() {
        Config::load(&options.config_path)
            .with_context(|| format!("failed to load config from {}", options.config_path.display()))?
    } else {
        eprintln!(
            "[harvestd] no config at {}, using defaults",
            options.config_path.display()
        );
        Config::default()
    };

    let logging_guard = init_tracing(&config.logging)?;
    tracing::info!(target: "main", run_id = logging_guard.run_id(), "harvestd_starting");

    let coordinator = Arc::new(Coordinator::new(&config)?);
    coordinator.subscribe(Arc::new(CutLogConsumer));

    if options.probe {
        return run_probe(&coordinator).await;
    }

    let mut sigint = signal(SignalKind::interrupt()).context("failed to install SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    tokio::select! {
        result = run_stdin_ingress(Arc::clone(&coordinator)) => {
            result?;
        }
        _ = sigint.recv() => {
            tracing::info!(target: "main", "sigint_received");
        }
        _ = sigterm.recv() => {
            tracing::info!(target: "main", "sigterm_received");
        }
    }

    tracing::info!(
        target: "main",
        cut_results = coordinator.cut_result_count(),
        "harvestd_stopping"
    );
    Ok(())
}

/// Sends one sample feature vector to verify the inference server connection,
/// then exits.
async fn run_probe(coordinator: &Coordinator) -> Result<()> {
    let sample = FeatureVector {
        fruit_redness: 0.5,
        fruit_greenness: 0.2,
        leaf_health: 0.9,
        spot_count: 0.0,
        spot_darkness: 0.0,
        surface_texture: 0.3,
        size: 1.0,
        stem_brownness: 0.1,
        x_coordinate: 0,
        y_coordinate: 0,
    };

    match coordinator.analyze(&sample).await {
        Ok(decision) => {
            println!(
                "probe ok: ({},{}) decision={} probability={:.2}",
                decision.x_coordinate,
                decision.y_coordinate,
                decision.cut_decision.as_wire_str(),
                decision.probability
            );
            Ok(())
        }
        Err(err) => Err(anyhow::anyhow!("probe failed: {err}")),
    }
}
