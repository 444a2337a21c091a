//! Cinder - a conversational coding assistant for the terminal
//!
//! Reads user requests from stdin, drives the agent loop against the
//! Anthropic API, and renders tool activity as it happens. `exit` quits,
//! `new` starts a fresh conversation.

mod render;

use anyhow::Context;
use cinder_agent::{Agent, AnthropicClient, ToolExecutor};
use cinder_core::config::{project_root_from_env, Config};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Initialize tracing for logging
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinder=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let project_root = project_root_from_env();
    tracing::info!(root = %project_root.display(), "starting cinder");

    let config = Config::load(&project_root)
        .with_context(|| format!("failed to load config under {}", project_root.display()))?;

    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .context("ANTHROPIC_API_KEY is not set; add it to the environment or a .env file")?;

    let client = AnthropicClient::new(api_key);
    let executor =
        ToolExecutor::with_working_directory(&project_root).with_fetch_config(config.fetch.clone());
    let mut agent = Agent::new(client, executor, config.agent.clone());

    println!("Code Agent Initialized");
    println!("Enter your command (or 'exit' to quit, 'new' to reset):");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input.is_empty() {
            prompt()?;
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.eq_ignore_ascii_case("new") {
            agent.reset();
            println!("Started a new conversation.");
            prompt()?;
            continue;
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                print!("{}", render::render_event(&event));
                let _ = std::io::stdout().flush();
            }
        });

        let outcome = agent.run_turn(input, &tx).await;
        drop(tx);
        let _ = printer.await;

        // A failed turn is reported and the REPL keeps going.
        if let Err(e) = outcome {
            tracing::error!(error = %e, "turn failed");
            println!("Error: {}", e);
        }

        prompt()?;
    }

    tracing::info!("cinder shutting down");
    Ok(())
}
