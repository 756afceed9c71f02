// error.rs - Bot Error Types
// Every failure the command core can run into, from startup registration down
// to a help page that vanished while someone was clicking through it.
//
// Used by: every module (core operations return Result<_, BotError>)

use serenity::model::id::MessageId;
use thiserror::Error;

use crate::commands::registry::CommandId;

#[derive(Debug, Error)]
pub enum BotError {
    /// Two descriptors were registered under the same identifier
    #[error("a command with identifier `{0}` is already registered")]
    DuplicateIdentifier(CommandId),

    /// A name or alias clashes with one that is already registered
    #[error("the invocation name `{0}` is already taken")]
    DuplicateInvocationName(String),

    #[error("`{name}` needs at least {required} argument(s) but got {given}")]
    InsufficientArguments {
        name: String,
        required: usize,
        given: usize,
    },

    #[error("message {0} is not bound to the current help page")]
    StaleNavigationSession(MessageId),

    /// The message (or the reaction on it) no longer exists on Discord
    #[error("message {0} no longer exists")]
    EditTargetGone(MessageId),

    #[error("Discord request failed: {0}")]
    Discord(#[from] serenity::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl BotError {
    /// Errors that end a navigation session instead of just the current click
    pub fn is_terminal_for_session(&self) -> bool {
        matches!(self, BotError::EditTargetGone(_))
    }
}
