mod commands;
mod config;
mod console;
mod discord;
mod error;
mod gateway;

use std::sync::Arc;

use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    model::channel::{Message, Reaction},
    model::gateway::Ready,
    prelude::GatewayIntents,
};
use tokio::signal;
use tokio::sync::mpsc;

use crate::commands::dispatcher::{CommandDispatcher, DispatchOutcome};
use crate::commands::navigation::{NavigationOutcome, ReactionNavigator};
use crate::commands::pagination::HelpSessions;
use crate::commands::{builtin_registry, CommandSettings};
use crate::config::load_bot_config;
use crate::discord::{ShardManagerContainer, SerenityGateway};

// Event handler implementation
struct Handler {
    dispatcher: Arc<CommandDispatcher>,
    navigator: Arc<ReactionNavigator>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        println!("✅ Bot connected as {}!", ready.user.name);
        log::info!("Connected to {} guilds", ready.guilds.len());
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let gateway = SerenityGateway::from_context(&ctx).await;
        let incoming = discord::incoming_message(&msg);
        match self.dispatcher.dispatch(&gateway, &incoming).await {
            Ok(DispatchOutcome::Ignored) => {}
            Ok(outcome) => log::debug!("Message {} from {}: {:?}", msg.id, msg.author.id, outcome),
            Err(e) => {
                log::error!(
                    "❌ Command '{}' failed for user {} ({}): {}",
                    msg.content, msg.author.name, msg.author.id, e
                );
            }
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let event = match discord::reaction_event(&reaction) {
            Some(event) => event,
            None => return,
        };

        let gateway = SerenityGateway::from_context(&ctx).await;
        match self.navigator.on_reaction_add(&gateway, &event).await {
            NavigationOutcome::Ignored => {}
            outcome => log::debug!("Reaction {} on message {}: {:?}", event.symbol, reaction.message_id, outcome),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - must be done before any logging calls
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    let (config, config_path) = match load_bot_config() {
        Ok(loaded) => loaded,
        Err(error) => {
            log::error!("❌ Failed to load botconfig.txt: {}", error);
            eprintln!("❌ Failed to load botconfig.txt: {}", error);
            eprintln!("Create a botconfig.txt file in the project root with: DISCORD_TOKEN=your_token_here and PREFIX=^");
            return;
        }
    };
    println!("✅ Configuration loaded from {}", config_path);

    let registry = match builtin_registry() {
        Ok(registry) => Arc::new(registry),
        Err(error) => {
            log::error!("❌ Failed to register commands: {}", error);
            eprintln!("❌ Failed to register commands: {}", error);
            return;
        }
    };

    let settings = Arc::new(CommandSettings {
        prefix: config.prefix.clone(),
        bot_name: config.bot_name.clone(),
    });
    let sessions = Arc::new(HelpSessions::new());
    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&settings),
        Arc::clone(&registry),
        Arc::clone(&sessions),
    ));
    let navigator = Arc::new(ReactionNavigator::new(
        Arc::clone(&registry),
        Arc::clone(&sessions),
        Arc::clone(&settings),
    ));
    println!(
        "🤖 Starting {} with prefix: '{}' ({} commands)",
        settings.bot_name,
        settings.prefix,
        registry.count()
    );

    // Configure bot intents
    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        dispatcher: Arc::clone(&dispatcher),
        navigator,
    };
    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Error creating Discord client: {:?}", e);
            eprintln!("❌ Error creating Discord client: {:?}", e);
            eprintln!("Check your token in botconfig.txt file");
            return;
        }
    };

    let shard_manager = Arc::clone(&client.shard_manager);
    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(Arc::clone(&shard_manager));
    }

    // Set up command line interface for graceful shutdown
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<String>(1);
    let cmd_task = tokio::spawn(console::handle_command_line(shutdown_tx.clone(), dispatcher));

    println!("🚀 Bot is running...");
    println!("💡 Use 'quit' command to stop gracefully, or press Ctrl+C");
    tokio::select! {
        _ = signal::ctrl_c() => {
            println!("\n⏹️ Stopping bot gracefully...");
        }
        shutdown_signal = shutdown_rx.recv() => {
            if let Some(signal) = shutdown_signal {
                println!("📡 Received '{}' command, stopping bot gracefully...", signal);
            }
        }
        result = client.start() => {
            if let Err(why) = result {
                log::error!("❌ Client error: {:?}", why);
                eprintln!("❌ Client error: {:?}", why);
            }
        }
    }

    shard_manager.lock().await.shutdown_all().await;
    cmd_task.abort();

    println!("✅ Bot stopped");
}
