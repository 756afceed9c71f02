// ping.rs - Ping Command Module
// This module implements the ^ping command, which reports message latency and
// the websocket heartbeat latency.
//
// Key Features:
// - Sends a placeholder first, then edits it with the measured delay
// - Delay is taken from Discord timestamps, clamped to zero on clock skew
//
// Used by: commands/mod.rs (command registration)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;

use crate::commands::registry::{CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::IncomingMessage;

pub const PLACEHOLDER: &str = "Getting ping...";

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("ping"), "ping")
        .description("Shows the message and websocket latency of the bot.")
}

/// Milliseconds between the triggering message and the reply, never negative
pub fn round_trip_millis(sent: DateTime<Utc>, reply: DateTime<Utc>) -> i64 {
    (reply - sent).num_milliseconds().max(0)
}

pub fn format_latency(latency: Option<Duration>) -> String {
    match latency {
        Some(latency) => format!("{}ms", latency.as_millis()),
        None => "unknown".to_string(),
    }
}

pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, _args: &[String]) -> Result<(), BotError> {
        let placeholder = ctx.gateway.send_text(message.channel_id, PLACEHOLDER).await?;

        let delay = round_trip_millis(message.created_at, placeholder.created_at);
        let websocket = format_latency(ctx.gateway.gateway_latency().await);
        let content = format!("Ping: {}ms, Websocket: {}", delay, websocket);

        // The placeholder already answered the user
        if let Err(e) = ctx.gateway.edit_text(placeholder.handle, &content).await {
            warn!(
                "[{}] Failed to update {} message with delay: {}",
                ctx.trace_id, ctx.descriptor.name, e
            );
        }
        Ok(())
    }
}
