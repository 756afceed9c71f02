// commands/mod.rs - Command Module Registry
// Declares all command modules and builds the registry of built-in commands
// that main.rs hands to the dispatcher.

pub mod dispatcher;     // Prefix matching, argument checks, handler invocation
pub mod echo;           // Echo command for testing
pub mod fun;            // Slap and other throwaway commands
pub mod help;           // Paginated help page and per-command details
pub mod helppage;       // Action command to close or inspect the navigable help page
pub mod hostinfo;       // Host OS / CPU / uptime report
pub mod navigation;     // ⬅️/➡️ reaction handling for the help page
pub mod pagination;     // Help page window state and the current session slot
pub mod ping;           // Message and websocket latency
pub mod prefix;         // Shows the configured command prefix
pub mod registry;       // Command descriptors and lookup
pub mod snowflake;      // Discord ID decoding and user info

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BotError;
use crate::gateway::{Gateway, IncomingMessage};
use self::pagination::HelpSessions;
use self::registry::{CommandDescriptor, CommandRegistry};

// ============================================================================
// HANDLER SEAM
// ============================================================================

/// Settings every handler may read. Fixed once the bot has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    pub prefix: String,
    pub bot_name: String,
}

/// Everything a handler gets besides the message itself
pub struct CommandContext<'a> {
    pub gateway: &'a dyn Gateway,
    pub registry: &'a CommandRegistry,
    pub sessions: &'a HelpSessions,
    pub settings: &'a CommandSettings,
    /// Descriptor of the command being run
    pub descriptor: &'a CommandDescriptor,
    pub trace_id: &'a str,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError>;
}

// ============================================================================
// BUILT-IN COMMANDS
// ============================================================================

/// Registry with every built-in command, in help-page order
pub fn builtin_registry() -> Result<CommandRegistry, BotError> {
    let mut registry = CommandRegistry::new();
    registry.register(help::descriptor(), Arc::new(help::HelpCommand))?;
    registry.register(ping::descriptor(), Arc::new(ping::PingCommand))?;
    registry.register(echo::descriptor(), Arc::new(echo::EchoCommand))?;
    registry.register(fun::slap_descriptor(), Arc::new(fun::SlapCommand))?;
    registry.register(hostinfo::descriptor(), Arc::new(hostinfo::HostInformationCommand::new()))?;
    registry.register(snowflake::user_info_descriptor(), Arc::new(snowflake::UserInfoCommand))?;
    registry.register(snowflake::snowflake_descriptor(), Arc::new(snowflake::SnowflakeCommand))?;
    registry.register(prefix::descriptor(), Arc::new(prefix::PrefixCommand))?;
    registry.register(helppage::descriptor(), Arc::new(helppage::HelpPageCommand))?;
    Ok(registry)
}
