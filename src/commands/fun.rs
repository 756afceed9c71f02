// fun.rs - Fun Commands
// Small commands with no purpose beyond a laugh.

use async_trait::async_trait;

use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::IncomingMessage;

pub fn slap_descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("slap"), "slap")
        .argument("target")
        .description("Slaps someone, or something.")
        .category(CommandCategory::Fun)
}

pub struct SlapCommand;

#[async_trait]
impl CommandHandler for SlapCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError> {
        let reply = format!("*<@{}> slaps {}*", message.author_id, args.join(" "));
        ctx.gateway.send_text(message.channel_id, &reply).await?;
        Ok(())
    }
}
