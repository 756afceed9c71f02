// snowflake.rs - Discord ID Commands
// Decodes Discord snowflake IDs and shows basic information about a user.
//
// Key Features:
// - ^snowflake <id> breaks an ID into creation time, worker, process and increment
// - ^userinfo [user] accepts a mention or a raw ID, defaulting to the caller
// - Account creation time comes from the ID itself, no extra API call
//
// Used by: commands/mod.rs (command registration)

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use serenity::model::id::UserId;

use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId};
use crate::commands::{CommandContext, CommandHandler};
use crate::error::BotError;
use crate::gateway::{EmbedContent, IncomingMessage};

/// First millisecond of 2015, where Discord IDs start counting
pub const DISCORD_EPOCH_MILLIS: u64 = 1_420_070_400_000;

const SNOWFLAKE_COLOUR: u32 = 0x5865F2;

pub fn snowflake_descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("snowflake"), "snowflake")
        .argument("id")
        .description("Shows when a Discord ID was created and what it is made of.")
        .category(CommandCategory::Info)
}

pub fn user_info_descriptor() -> CommandDescriptor {
    CommandDescriptor::new(CommandId::new("userinfo"), "userinfo")
        .alias("whois")
        .optional_argument("user")
        .description("Shows information about a user, or about you.")
        .category(CommandCategory::Info)
}

// ============================================================================
// DECODING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snowflake {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub worker: u8,
    pub process: u8,
    pub increment: u16,
}

impl Snowflake {
    pub fn decode(id: u64) -> Option<Snowflake> {
        let millis = i64::try_from((id >> 22) + DISCORD_EPOCH_MILLIS).ok()?;
        let created_at = Utc.timestamp_millis_opt(millis).single()?;
        Some(Snowflake {
            id,
            created_at,
            worker: ((id & 0x3E0000) >> 17) as u8,
            process: ((id & 0x1F000) >> 12) as u8,
            increment: (id & 0xFFF) as u16,
        })
    }
}

/// Raw ID, `<@id>` or `<@!id>`
pub fn parse_id(text: &str) -> Option<u64> {
    let trimmed = text
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.strip_prefix('!').unwrap_or(rest))
        .unwrap_or(text);
    trimmed.parse().ok()
}

pub fn format_created(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn invalid_id_reply(text: &str) -> String {
    format!("`{}` is not a valid ID.", text)
}

// ============================================================================
// COMMAND IMPLEMENTATIONS
// ============================================================================

pub struct SnowflakeCommand;

#[async_trait]
impl CommandHandler for SnowflakeCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError> {
        let text = args.first().map(String::as_str).unwrap_or_default();
        let snowflake = match parse_id(text).and_then(Snowflake::decode) {
            Some(snowflake) => snowflake,
            None => {
                debug!("[{}] `{}` is not a snowflake", ctx.trace_id, text);
                ctx.gateway.send_text(message.channel_id, &invalid_id_reply(text)).await?;
                return Ok(());
            }
        };

        let embed = EmbedContent::new()
            .title(format!("Snowflake {}", snowflake.id))
            .colour(SNOWFLAKE_COLOUR)
            .field("Created", format_created(snowflake.created_at), false)
            .field("Worker", snowflake.worker.to_string(), true)
            .field("Process", snowflake.process.to_string(), true)
            .field("Increment", snowflake.increment.to_string(), true);
        ctx.gateway.send_embed(message.channel_id, &embed).await?;
        Ok(())
    }
}

pub struct UserInfoCommand;

#[async_trait]
impl CommandHandler for UserInfoCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError> {
        let user = match args.first() {
            None => Some(message.author_id),
            Some(text) => parse_id(text).map(UserId),
        };
        let decoded = user.and_then(|user| Snowflake::decode(user.0).map(|snowflake| (user, snowflake)));

        let (user, snowflake) = match decoded {
            Some(found) => found,
            None => {
                let text = args.first().map(String::as_str).unwrap_or_default();
                ctx.gateway.send_text(message.channel_id, &invalid_id_reply(text)).await?;
                return Ok(());
            }
        };

        let embed = EmbedContent::new()
            .title("User Information")
            .colour(SNOWFLAKE_COLOUR)
            .field("User", format!("<@{}>", user), true)
            .field("ID", user.to_string(), true)
            .field("Account Created", format_created(snowflake.created_at), false);
        ctx.gateway.send_embed(message.channel_id, &embed).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{incoming, run_command, TEST_CHANNEL};
    use crate::gateway::testing::{GatewayCall, RecordingGateway};

    // Example ID from the Discord developer documentation
    const SAMPLE_ID: u64 = 175928847299117063;

    #[test]
    fn test_decode_sample_id() {
        let snowflake = Snowflake::decode(SAMPLE_ID).unwrap();
        assert_eq!(snowflake.created_at.timestamp_millis(), 1_462_015_105_796);
        assert_eq!(format_created(snowflake.created_at), "2016-04-30 11:18:25 UTC");
        assert_eq!(snowflake.worker, 1);
        assert_eq!(snowflake.process, 0);
        assert_eq!(snowflake.increment, 7);
    }

    #[test]
    fn test_decode_zero_is_the_epoch() {
        let snowflake = Snowflake::decode(0).unwrap();
        assert_eq!(format_created(snowflake.created_at), "2015-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_parse_id_accepts_mentions() {
        assert_eq!(parse_id("123"), Some(123));
        assert_eq!(parse_id("<@123>"), Some(123));
        assert_eq!(parse_id("<@!123>"), Some(123));
        assert_eq!(parse_id("<#123>"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-5"), None);
    }

    #[tokio::test]
    async fn test_snowflake_command_embed() {
        let gateway = RecordingGateway::new(UserId(1));
        let text = SAMPLE_ID.to_string();

        run_command(&SnowflakeCommand, &snowflake_descriptor(), &gateway, &incoming("^snowflake"), &[text.as_str()])
            .await
            .unwrap();

        match &gateway.calls()[0] {
            GatewayCall::SendEmbed { embed, .. } => {
                assert_eq!(embed.title.as_deref(), Some("Snowflake 175928847299117063"));
                let values: Vec<&str> = embed.fields.iter().map(|f| f.value.as_str()).collect();
                assert_eq!(values, vec!["2016-04-30 11:18:25 UTC", "1", "0", "7"]);
            }
            other => panic!("expected an embed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snowflake_command_rejects_garbage() {
        let gateway = RecordingGateway::new(UserId(1));

        run_command(&SnowflakeCommand, &snowflake_descriptor(), &gateway, &incoming("^snowflake"), &["soon"])
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::SendText {
                channel_id: TEST_CHANNEL,
                content: "`soon` is not a valid ID.".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_userinfo_defaults_to_author() {
        let gateway = RecordingGateway::new(UserId(1));

        run_command(&UserInfoCommand, &user_info_descriptor(), &gateway, &incoming("^userinfo"), &[])
            .await
            .unwrap();

        match &gateway.calls()[0] {
            GatewayCall::SendEmbed { embed, .. } => {
                assert_eq!(embed.fields[0].value, "<@7>");
                assert_eq!(embed.fields[1].value, "7");
            }
            other => panic!("expected an embed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_userinfo_for_mentioned_user() {
        let gateway = RecordingGateway::new(UserId(1));
        let mention = format!("<@!{}>", SAMPLE_ID);

        run_command(&UserInfoCommand, &user_info_descriptor(), &gateway, &incoming("^userinfo"), &[mention.as_str()])
            .await
            .unwrap();

        match &gateway.calls()[0] {
            GatewayCall::SendEmbed { embed, .. } => {
                assert_eq!(embed.fields[1].value, SAMPLE_ID.to_string());
                assert_eq!(embed.fields[2].name, "Account Created");
                assert_eq!(embed.fields[2].value, "2016-04-30 11:18:25 UTC");
            }
            other => panic!("expected an embed, got {:?}", other),
        }
    }
}
