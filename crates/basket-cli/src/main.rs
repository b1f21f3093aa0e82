//! Line-based chat frontend: reads messages from stdin, prints the bot's
//! replies. One process hosts one conversation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use basket_config::{load_config, BasketConfig};
use basket_core::DialogEngine;
use basket_dialogs::{
    build_registry, HttpRecognizer, HttpRecognizerConfig, NoopRecognizer, Recognizer, Services,
    MAIN_DIALOG,
};
use basket_runtime::TurnRuntime;
use basket_stores::{
    HttpItemStore, HttpItemStoreConfig, InMemoryItemStore, InMemoryStateStore, ItemStore,
};

#[derive(Debug, Parser)]
#[command(name = "basket")]
struct Args {
    #[arg(long, default_value = "config/basket.yaml")]
    config: PathBuf,
    /// Conversation id to resume; a fresh one is generated when omitted.
    #[arg(long)]
    conversation: Option<String>,
}

fn build_store(config: &BasketConfig) -> anyhow::Result<Arc<dyn ItemStore>> {
    match config.store.backend.as_str() {
        "http" => {
            let endpoint = config
                .store
                .endpoint
                .clone()
                .context("store.endpoint missing")?;
            let store = HttpItemStore::new(HttpItemStoreConfig {
                base_url: endpoint,
                timeout_secs: config.store.timeout_secs,
            })?;
            Ok(Arc::new(store))
        }
        _ => Ok(Arc::new(InMemoryItemStore::new())),
    }
}

fn build_recognizer(config: &BasketConfig) -> anyhow::Result<Arc<dyn Recognizer>> {
    match config.recognizer.backend.as_str() {
        "http" => {
            let recognizer = HttpRecognizer::new(HttpRecognizerConfig {
                endpoint: config.recognizer.endpoint.clone().unwrap_or_default(),
                app_id: config.recognizer.app_id.clone().unwrap_or_default(),
                api_key: config.recognizer.api_key.clone().unwrap_or_default(),
                slot: config.recognizer.slot.clone(),
                timeout_secs: config.recognizer.timeout_secs,
            })?;
            Ok(Arc::new(recognizer))
        }
        _ => Ok(Arc::new(NoopRecognizer)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if args.config.exists() {
        load_config(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?
    } else {
        BasketConfig::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.observability.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let services = Services::new(build_store(&config)?, build_recognizer(&config)?);
    let engine = DialogEngine::new(Arc::new(build_registry(&services)), MAIN_DIALOG);
    let runtime = TurnRuntime::new(engine, Arc::new(InMemoryStateStore::new()));

    let conversation_id = args
        .conversation
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    tracing::info!(app = %config.app.name, %conversation_id, "basket ready");

    println!("Welcome to your shopping list. Say something like \"Add 2 kg bananas\".");
    println!("(help: \"help\", abort the current task: \"cancel\", exit: Ctrl-D)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let responses = runtime.handle_turn(&conversation_id, text).await?;
        for message in responses {
            println!("bot> {}", message.text);
        }
    }

    Ok(())
}
