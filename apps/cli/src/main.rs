use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use client_core::{DreamClient, StateChange, SubmissionResult};
use shared::domain::DreamRecord;
use tracing::warn;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the interpretation service.
    #[arg(long)]
    server_url: Option<String>,
    /// Dream text to submit. Without it, only the recorded history is shown.
    dream: Option<String>,
}

const HISTORY_REFRESH_WAIT: Duration = Duration::from_secs(5);

fn print_history(history: &[DreamRecord]) {
    if history.is_empty() {
        println!("No past dreams recorded.");
        return;
    }
    println!("Past dreams (latest first):");
    for record in history {
        println!("- Dream: {}", record.dream_text);
        println!("  Interpretation: {}", record.interpretation);
        println!("  Emotion: {}", record.emotion);
        println!("  Confidence: {:.2}", record.confidence);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let settings = load_settings(args.server_url);

    let client = DreamClient::new(settings.server_url);
    client.refresh_history().await;
    print_history(&client.state().await.history);

    let Some(dream) = args.dream else {
        return Ok(());
    };

    let mut changes = client.subscribe();
    client.edit_draft(dream.clone()).await;
    client.submit_dream(&dream).await?;

    match client.state().await.last_result {
        Some(SubmissionResult::Interpreted(outcome)) => {
            println!();
            println!("Interpretation: {}", outcome.interpretation);
            println!("Emotion: {}", outcome.emotion);
            println!("Confidence: {:.2}", outcome.confidence);

            // The submission triggered a history refresh; wait for it to
            // land before printing the updated list.
            let history_loaded = async {
                while let Ok(change) = changes.recv().await {
                    if matches!(change, StateChange::HistoryLoaded(_)) {
                        break;
                    }
                }
            };
            if tokio::time::timeout(HISTORY_REFRESH_WAIT, history_loaded)
                .await
                .is_err()
            {
                warn!("history refresh did not complete; showing last known list");
            }

            println!();
            print_history(&client.state().await.history);
        }
        Some(SubmissionResult::Failed(error)) => {
            println!("{}", error.message);
        }
        None => {}
    }

    Ok(())
}
