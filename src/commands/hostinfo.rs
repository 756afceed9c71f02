// hostinfo.rs - Host Information Command
// Reports what the bot is running on: OS, architecture, CPU count, process
// uptime and crate version.
//
// Used by: commands/mod.rs (command registration)

use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::{EmbedContent, IncomingMessage};

const HOST_COLOUR: u32 = 0x00AA55;

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("hostinformation"), "hostinformation")
        .alias("hostinfo")
        .description("Shows information about the machine the bot runs on.")
        .category(CommandCategory::Info)
}

/// `1d 2h 3m 4s`, leading zero units dropped
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (days, hours, minutes, seconds) = (total / 86_400, total / 3_600 % 24, total / 60 % 60, total % 60);

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

pub struct HostInformationCommand {
    started: Instant,
}

impl HostInformationCommand {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn render(&self) -> EmbedContent {
        let cpus = thread::available_parallelism()
            .map(|count| count.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        EmbedContent::new()
            .title("Host Information")
            .colour(HOST_COLOUR)
            .field("Operating System", std::env::consts::OS, true)
            .field("Architecture", std::env::consts::ARCH, true)
            .field("CPUs", cpus, true)
            .field("Uptime", format_uptime(self.started.elapsed()), true)
            .field("Version", env!("CARGO_PKG_VERSION"), true)
    }
}

impl Default for HostInformationCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for HostInformationCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, _args: &[String]) -> Result<(), BotError> {
        ctx.gateway.send_embed(message.channel_id, &self.render()).await?;
        Ok(())
    }
}
