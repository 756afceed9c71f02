// echo.rs - Echo Command Module
// This module implements the ^echo command, which repeats back user input for testing purposes.
//
// Used by: commands/mod.rs (command registration)

use async_trait::async_trait;

use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::IncomingMessage;

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("echo"), "echo")
        .argument("text")
        .description("Repeats the given text back.")
        .category(CommandCategory::Fun)
}

pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    /// Arguments come pre-split, so runs of whitespace collapse to one space
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError> {
        ctx.gateway.send_text(message.channel_id, &args.join(" ")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{incoming, run_command, TEST_CHANNEL};
    use crate::gateway::testing::{GatewayCall, RecordingGateway};
    use serenity::model::id::UserId;

    #[tokio::test]
    async fn test_echo_joins_arguments() {
        let gateway = RecordingGateway::new(UserId(1));

        run_command(&EchoCommand, &descriptor(), &gateway, &incoming("^echo hi  there"), &["hi", "there"])
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::SendText {
                channel_id: TEST_CHANNEL,
                content: "hi there".to_string(),
            }]
        );
    }
}
