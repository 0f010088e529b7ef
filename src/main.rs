use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use taskboard::backend::auth::{Authorizer, TokenStore};
use taskboard::backend::google::GoogleTasksClient;
use taskboard::backend::{ListTasksOptions, TaskClient};
use taskboard::config::Config;
use taskboard::constants::AUTH_PROMPT;
use taskboard::sync::Reconciler;
use taskboard::{logger, ui};

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Two-column task board for Google Tasks", version)]
struct Cli {
    /// Path to a configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,

    /// Print task lists and their tasks, then exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.generate_config {
        let path = match path {
            Some(path) => path,
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(path);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    if let Some(path) = logger::init(&config.logging)? {
        info!("Logging to {}", path.display());
    }

    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel();
    let http = GoogleTasksClient::http_client(config.sync.request_timeout())?;
    let authorizer = Authorizer::new(
        config.google.client_secrets()?,
        TokenStore::new(config.google.token_path()?),
        http.clone(),
        config.google.auth_timeout(),
    )
    .with_prompt(prompt_tx);
    let client = Arc::new(GoogleTasksClient::new(http, authorizer));

    // Consent URLs go to stdout until the board owns the terminal
    let authorized = print_prompts_while(client.ensure_authorized(), &mut prompt_rx).await;

    if cli.list {
        authorized.context("Authorization failed")?;
        return print_lists(client.as_ref()).await;
    }
    if let Err(e) = &authorized {
        eprintln!("⚠ Authorization failed: {e}");
        error!("Authorization failed: {e}");
    }

    let mut engine = Reconciler::new(client, config.sync.request_timeout());
    match print_prompts_while(engine.load_from_remote(), &mut prompt_rx).await {
        Ok(true) => info!("Initial load finished"),
        Ok(false) => info!("No task lists found, starting with an empty board"),
        Err(e) => error!("Initial load failed: {e}"),
    }

    ui::run_app(&config, engine, Some(prompt_rx)).await
}

/// Drive `fut` to completion, printing any consent URL it asks for.
async fn print_prompts_while<T>(fut: impl Future<Output = T>, prompt_rx: &mut mpsc::UnboundedReceiver<String>) -> T {
    tokio::pin!(fut);
    loop {
        tokio::select! {
            result = &mut fut => return result,
            Some(url) = prompt_rx.recv() => println!("{AUTH_PROMPT}\n{url}\n"),
        }
    }
}

async fn print_lists(client: &dyn TaskClient) -> Result<()> {
    let lists = client.list_task_lists().await?;
    if lists.is_empty() {
        println!("No task lists found.");
        return Ok(());
    }
    for list in lists {
        println!("List: {} ({})", list.title, list.id);
        for task in client.list_tasks(&list.id, ListTasksOptions::all()).await? {
            let mark = if task.is_completed() { "x" } else { " " };
            println!(
                "  [{mark}] {} ({})",
                task.title.as_deref().unwrap_or_default(),
                task.id.as_deref().unwrap_or_default()
            );
        }
    }
    Ok(())
}
