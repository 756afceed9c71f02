// gateway.rs - Chat Gateway Boundary
// The narrow slice of Discord the command core talks to: send, edit, react,
// list who reacted, and read the websocket latency. The serenity-backed
// implementation lives in discord.rs; tests use the recording fake below.
//
// Key Features:
// - Plain value types for inbound events (no live serenity objects)
// - Message identity as a stable (channel, message) handle
// - Lazy reaction-actor stream
//
// Used by: commands/*, discord.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::stream::BoxStream;
use serenity::model::id::{ChannelId, MessageId, UserId};

use crate::error::BotError;

// ============================================================================
// VALUE TYPES
// ============================================================================

/// Stable identity of a message the bot can edit or react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl MessageHandle {
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self { channel_id, message_id }
    }
}

/// A message the bot just sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub handle: MessageHandle,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed description handed to the gateway for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: u32,
    pub fields: Vec<EmbedField>,
}

impl EmbedContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

/// Inbound text message, already stripped down to what dispatch needs
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub content: String,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Inbound reaction-add event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub actor: UserId,
    pub message: MessageHandle,
    pub symbol: String,
}

/// Users that reacted with a given symbol. Finite and single-use: requests are
/// issued as the stream is polled.
pub type ActorStream = BoxStream<'static, Result<UserId, BotError>>;

// ============================================================================
// GATEWAY TRAIT
// ============================================================================

#[async_trait]
pub trait Gateway: Send + Sync {
    /// User id of the bot account itself
    fn current_user_id(&self) -> UserId;

    async fn send_text(&self, channel_id: ChannelId, content: &str) -> Result<SentMessage, BotError>;

    async fn send_embed(&self, channel_id: ChannelId, embed: &EmbedContent) -> Result<SentMessage, BotError>;

    /// Fails with `EditTargetGone` once the message has been deleted
    async fn edit_text(&self, message: MessageHandle, content: &str) -> Result<(), BotError>;

    /// Fails with `EditTargetGone` once the message has been deleted
    async fn edit_embed(&self, message: MessageHandle, embed: &EmbedContent) -> Result<(), BotError>;

    async fn add_reaction(&self, message: MessageHandle, symbol: &str) -> Result<(), BotError>;

    async fn remove_reaction(&self, message: MessageHandle, symbol: &str, actor: UserId) -> Result<(), BotError>;

    fn reaction_actors(&self, message: MessageHandle, symbol: &str) -> ActorStream;

    /// Heartbeat latency of the shard that delivered the current event
    async fn gateway_latency(&self) -> Option<Duration>;
}

// ============================================================================
// RECORDING GATEWAY (tests)
// ============================================================================
