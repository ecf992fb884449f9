use clap::{Parser, Subcommand};
use std::collections::HashMap;
use tgfeed_client::api::BotApi;
use tgfeed_client::provider::{BotUpdate, UpdatesProvider};
use tgfeed_core::config;
use tgfeed_core::offset::BotId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "tgfeed",
    version,
    about = "Multi-bot long-polling update pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "tgfeed.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start polling every enabled bot; echoes text messages back.
    Start,
    /// Check the config and probe each bot against the platform.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => start(&cli.config).await,
        Commands::Status => status(&cli.config).await,
    }
}

async fn start(config_path: &str) -> anyhow::Result<()> {
    let cfg = config::load(config_path)?;

    let enabled: Vec<_> = cfg.bots.iter().filter(|bot| bot.enabled).collect();
    if enabled.is_empty() {
        anyhow::bail!("No bots enabled. Add at least one [[bots]] entry to {config_path}.");
    }
    for bot in &enabled {
        if bot.token.is_empty() {
            anyhow::bail!(
                "bot '{}' is enabled but its token is empty. Set it in {config_path}.",
                bot.name
            );
        }
    }

    let provider = UpdatesProvider::builder(cfg.platform.clone()).build();

    // Merge every bot's stream into one pipeline.
    let (tx, mut rx) = mpsc::channel::<BotUpdate>(256);
    let mut senders: HashMap<BotId, BotApi> = HashMap::new();

    for bot in &enabled {
        let mut bot_rx = provider.start(bot)?;
        senders.insert(bot.id(), provider.bot_api(bot)?);

        let tx = tx.clone();
        let name = bot.name.clone();
        tokio::spawn(async move {
            while let Some(update) = bot_rx.recv().await {
                if tx.send(update).await.is_err() {
                    info!("pipeline receiver dropped, stopping {name} forwarder");
                    break;
                }
            }
        });

        info!("Bot started: {}", bot.name);
    }
    drop(tx);

    info!(
        "tgfeed running | bots: {}",
        enabled
            .iter()
            .map(|bot| bot.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    loop {
        tokio::select! {
            Some(incoming) = rx.recv() => {
                handle_update(&senders, incoming).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    Ok(())
}

/// Log each update; echo plain text messages back to their chat.
async fn handle_update(senders: &HashMap<BotId, BotApi>, incoming: BotUpdate) {
    let BotUpdate { bot, update } = incoming;

    let msg = match update.message {
        Some(msg) => msg,
        None => {
            debug!("bot {bot}: ignoring update without a message");
            return;
        }
    };
    let text = match msg.text {
        Some(text) => text,
        None => {
            debug!(
                "bot {bot}: ignoring non-text message in chat {}",
                msg.chat.id
            );
            return;
        }
    };
    let api = match senders.get(&bot) {
        Some(api) => api,
        None => return,
    };

    info!(
        "bot {bot}: text message in chat {} ({} chars)",
        msg.chat.id,
        text.len()
    );

    if let Err(e) = api.send_chat_action(msg.chat.id, "typing").await {
        debug!("bot {bot}: chat action failed: {e}");
    }
    if let Err(e) = api.send_message(msg.chat.id, &text).await {
        warn!("bot {bot}: echo failed: {e}");
    }
}

async fn status(config_path: &str) -> anyhow::Result<()> {
    let cfg = config::load(config_path)?;

    println!("tgfeed — Status Check\n");
    println!("Config: {config_path}");
    println!("Platform: {}", cfg.platform.base_url);
    println!();

    if cfg.bots.is_empty() {
        println!("  no bots configured");
        return Ok(());
    }

    let provider = UpdatesProvider::builder(cfg.platform.clone()).build();
    for bot in &cfg.bots {
        if !bot.enabled {
            println!("  {}: disabled", bot.name);
            continue;
        }
        if bot.token.is_empty() {
            println!("  {}: enabled but missing token", bot.name);
            continue;
        }
        match provider.bot_api(bot)?.get_me().await {
            Ok(me) => {
                let handle = me.username.unwrap_or(me.first_name);
                println!("  {}: @{handle} reachable", bot.name);
            }
            Err(e) => println!("  {}: unreachable ({e})", bot.name),
        }
    }

    Ok(())
}
