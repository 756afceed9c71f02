// prefix.rs - Prefix Command Module
// Tells users which prefix the bot answers to and where it is configured.
//
// Used by: commands/mod.rs (command registration)

use async_trait::async_trait;

use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::IncomingMessage;

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("prefix"), "prefix")
        .description("Shows the prefix this bot listens to.")
        .category(CommandCategory::Settings)
}

pub struct PrefixCommand;

#[async_trait]
impl CommandHandler for PrefixCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, _args: &[String]) -> Result<(), BotError> {
        let reply = format!(
            "My prefix is `{}`. It can be changed with `PREFIX=` in botconfig.txt.",
            ctx.settings.prefix
        );
        ctx.gateway.send_text(message.channel_id, &reply).await?;
        Ok(())
    }
}
