// discord.rs - Serenity Gateway
// Implements the Gateway trait on top of serenity's HTTP client and shard
// manager, and converts serenity events into the plain inbound types.
//
// Key Features:
// - 404 responses surface as EditTargetGone
// - Reaction users fetched lazily, 100 per request
// - Websocket latency read from the shard runner that delivered the event
//
// Used by: main.rs (event handler)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serenity::builder::CreateEmbed;
use serenity::client::bridge::gateway::{ShardId, ShardManager};
use serenity::client::Context;
use serenity::http::{Http, HttpError};
use serenity::model::channel::{Message, Reaction, ReactionType};
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::prelude::{Mutex, TypeMapKey};

use crate::error::BotError;
use crate::gateway::{ActorStream, EmbedContent, Gateway, IncomingMessage, MessageHandle, ReactionEvent, SentMessage};

/// Users per reaction_users request (Discord's maximum)
const REACTION_PAGE_LIMIT: u8 = 100;

// TypeMap key for the shard manager, needed for websocket latency
pub struct ShardManagerContainer;
impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<Mutex<ShardManager>>;
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Statuses meaning the message no longer exists
fn is_gone_status(status: u16) -> bool {
    status == 404
}

fn classify(error: serenity::Error, message_id: MessageId) -> BotError {
    if let serenity::Error::Http(http_error) = &error {
        if let HttpError::UnsuccessfulRequest(response) = http_error.as_ref() {
            if is_gone_status(response.status_code.as_u16()) {
                return BotError::EditTargetGone(message_id);
            }
        }
    }
    BotError::Discord(error)
}

fn build_embed(content: &EmbedContent) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    if let Some(title) = &content.title {
        embed.title(title);
    }
    if let Some(description) = &content.description {
        embed.description(description);
    }
    embed.colour(content.colour);
    for field in &content.fields {
        embed.field(&field.name, &field.value, field.inline);
    }
    embed
}

fn sent(message: &Message) -> SentMessage {
    SentMessage {
        handle: MessageHandle::new(message.channel_id, message.id),
        created_at: timestamp(message),
    }
}

fn timestamp(message: &Message) -> DateTime<Utc> {
    *message.timestamp
}

pub fn incoming_message(message: &Message) -> IncomingMessage {
    IncomingMessage {
        content: message.content.clone(),
        channel_id: message.channel_id,
        author_id: message.author.id,
        created_at: timestamp(message),
    }
}

/// Only unicode reactions with a known actor can drive navigation
pub fn reaction_event(reaction: &Reaction) -> Option<ReactionEvent> {
    let actor = reaction.user_id?;
    match &reaction.emoji {
        ReactionType::Unicode(symbol) => Some(ReactionEvent {
            actor,
            message: MessageHandle::new(reaction.channel_id, reaction.message_id),
            symbol: symbol.clone(),
        }),
        _ => None,
    }
}

/// Cursor for the request after `page`; None when `page` was the last one
fn next_cursor(page: &[UserId]) -> Option<Option<UserId>> {
    if page.len() < REACTION_PAGE_LIMIT as usize {
        return None;
    }
    Some(page.last().copied())
}

// ============================================================================
// GATEWAY IMPLEMENTATION
// ============================================================================

pub struct SerenityGateway {
    http: Arc<Http>,
    bot_id: UserId,
    shard_id: u64,
    shard_manager: Option<Arc<Mutex<ShardManager>>>,
}

impl SerenityGateway {
    pub async fn from_context(ctx: &Context) -> Self {
        let shard_manager = ctx.data.read().await.get::<ShardManagerContainer>().cloned();
        Self {
            http: Arc::clone(&ctx.http),
            bot_id: ctx.cache.current_user_id(),
            shard_id: ctx.shard_id,
            shard_manager,
        }
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    fn current_user_id(&self) -> UserId {
        self.bot_id
    }

    async fn send_text(&self, channel_id: ChannelId, content: &str) -> Result<SentMessage, BotError> {
        let message = channel_id.say(&self.http, content).await?;
        Ok(sent(&message))
    }

    async fn send_embed(&self, channel_id: ChannelId, embed: &EmbedContent) -> Result<SentMessage, BotError> {
        let embed = build_embed(embed);
        let message = channel_id
            .send_message(&self.http, |m| m.set_embed(embed))
            .await?;
        Ok(sent(&message))
    }

    async fn edit_text(&self, message: MessageHandle, content: &str) -> Result<(), BotError> {
        message
            .channel_id
            .edit_message(&self.http, message.message_id, |m| m.content(content))
            .await
            .map(|_| ())
            .map_err(|e| classify(e, message.message_id))
    }

    async fn edit_embed(&self, message: MessageHandle, embed: &EmbedContent) -> Result<(), BotError> {
        let embed = build_embed(embed);
        message
            .channel_id
            .edit_message(&self.http, message.message_id, |m| m.set_embed(embed))
            .await
            .map(|_| ())
            .map_err(|e| classify(e, message.message_id))
    }

    async fn add_reaction(&self, message: MessageHandle, symbol: &str) -> Result<(), BotError> {
        message
            .channel_id
            .create_reaction(&self.http, message.message_id, ReactionType::Unicode(symbol.to_string()))
            .await
            .map_err(|e| classify(e, message.message_id))
    }

    async fn remove_reaction(&self, message: MessageHandle, symbol: &str, actor: UserId) -> Result<(), BotError> {
        message
            .channel_id
            .delete_reaction(
                &self.http,
                message.message_id,
                Some(actor),
                ReactionType::Unicode(symbol.to_string()),
            )
            .await
            .map_err(|e| classify(e, message.message_id))
    }

    fn reaction_actors(&self, message: MessageHandle, symbol: &str) -> ActorStream {
        let http = Arc::clone(&self.http);
        let reaction = ReactionType::Unicode(symbol.to_string());

        // State: None once the last page has been fetched, otherwise the cursor
        stream::unfold(Some(None::<UserId>), move |cursor| {
            let http = Arc::clone(&http);
            let reaction = reaction.clone();
            async move {
                let after = cursor?;
                let page = message
                    .channel_id
                    .reaction_users(&http, message.message_id, reaction, Some(REACTION_PAGE_LIMIT), after)
                    .await;

                match page {
                    Ok(users) => {
                        let ids: Vec<UserId> = users.iter().map(|user| user.id).collect();
                        let next = next_cursor(&ids);
                        let actors: Vec<Result<UserId, BotError>> = ids.into_iter().map(Ok).collect();
                        Some((stream::iter(actors), next))
                    }
                    Err(e) => Some((stream::iter(vec![Err(classify(e, message.message_id))]), None)),
                }
            }
        })
        .flatten()
        .boxed()
    }

    async fn gateway_latency(&self) -> Option<Duration> {
        let shard_manager = self.shard_manager.as_ref()?;
        let manager = shard_manager.lock().await;
        let runners = manager.runners.lock().await;
        let latency = runners.get(&ShardId(self.shard_id)).and_then(|runner| runner.latency);
        latency
    }
}
