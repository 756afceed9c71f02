// helppage.rs - Help Page Action Command
// Action command for the navigable help page. It is left off the paginated
// listing and documented only through ^help helppage.
//
// Key Features:
// - close: stops the current help page from reacting to ⬅️/➡️
// - status: reports which help page is current and how much of it is shown
//
// Used by: commands/mod.rs (command registration)

use async_trait::async_trait;
use log::info;

use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::IncomingMessage;

pub const HELP_PAGE_ID: CommandId = CommandId::new("helppage");

pub const NO_OPEN_PAGE: &str = "There is no open help page.";

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(HELP_PAGE_ID, "helppage")
        .argument("action")
        .description("Manages the help page that reacts to ⬅️/➡️.")
        .category(CommandCategory::Action)
        .action("close", "Stops the open help page from turning pages.")
        .action("status", "Shows which help page is open and how many commands it shows.")
}

pub struct HelpPageCommand;

impl HelpPageCommand {
    async fn close(&self, ctx: &CommandContext<'_>) -> String {
        match ctx.sessions.close().await {
            Some(message) => {
                info!("[{}] help page {} closed on request", ctx.trace_id, message.message_id);
                format!("Closed help page {}. Its arrows no longer turn pages.", message.message_id)
            }
            None => NO_OPEN_PAGE.to_string(),
        }
    }

    async fn status(&self, ctx: &CommandContext<'_>) -> String {
        match ctx.sessions.current().await {
            Some(session) => {
                let state = session.page.lock().await;
                format!(
                    "Help page {} is open, showing {} of {} commands.",
                    session.message.message_id,
                    state.shown().len(),
                    state.all_commands().len()
                )
            }
            None => NO_OPEN_PAGE.to_string(),
        }
    }
}

#[async_trait]
impl CommandHandler for HelpPageCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError> {
        let action = args.first().map(String::as_str).unwrap_or_default();
        let reply = match action {
            "close" => self.close(ctx).await,
            "status" => self.status(ctx).await,
            other => format!(
                "Unknown action `{}`. See `{}help {}` for the available actions.",
                other, ctx.settings.prefix, ctx.descriptor.name
            ),
        };
        ctx.gateway.send_text(message.channel_id, &reply).await?;
        Ok(())
    }
}
