use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{coordinator::Coordinator, gateway::types::FeatureVector};

/// One line of the NDJSON command stream. `analyze` carries the feature
/// vector fields inline next to the tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Command {
    Analyze {
        #[serde(flatten)]
        features: FeatureVector,
    },
    AgentReady {
        agent_id: String,
    },
    NotifyNow,
    Clear,
    Cuts,
}

/// Reads NDJSON commands from stdin until EOF and feeds them to the
/// coordinator. Malformed lines are logged and skipped, never fatal.
pub async fn run_stdin_ingress(coordinator: Arc<Coordinator>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read command line from stdin")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Command>(line) {
            Ok(command) => handle_command(&coordinator, command),
            Err(err) => {
                tracing::warn!(
                    target: "ingress",
                    error = %err,
                    line = %line,
                    "malformed_command_line"
                );
            }
        }
    }

    tracing::info!(target: "ingress", "command_stream_closed");
    Ok(())
}

fn handle_command(coordinator: &Arc<Coordinator>, command: Command) {
    match command {
        Command::Analyze { features } => {
            // Analysis is fire-and-forget from the command stream's point of
            // view; the outcome lands in the log and, for cut decisions, in
            // the store.
            let coordinator = Arc::clone(coordinator);
            tokio::spawn(async move {
                match coordinator.analyze(&features).await {
                    Ok(decision) => {
                        tracing::info!(
                            target: "ingress",
                            x = decision.x_coordinate,
                            y = decision.y_coordinate,
                            decision = decision.cut_decision.as_wire_str(),
                            probability = decision.probability,
                            "analyze_completed"
                        );
                    }
                    Err(err) => {
                        tracing::warn!(
                            target: "ingress",
                            kind = ?err.kind,
                            error = %err,
                            "analyze_failed"
                        );
                    }
                }
            });
        }
        Command::AgentReady { agent_id } => {
            coordinator.register_ready(&agent_id);
        }
        Command::NotifyNow => {
            coordinator.notify_now();
        }
        Command::Clear => {
            coordinator.clear_cut_results();
        }
        Command::Cuts => {
            let cuts = coordinator.cut_results();
            match serde_json::to_string(&cuts) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => {
                    tracing::warn!(target: "ingress", error = %err, "cuts_encode_failed");
                }
            }
        }
    }
}
