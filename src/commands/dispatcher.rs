// dispatcher.rs - Command Dispatcher
// Matches incoming text against `prefix + invocation name`, checks the argument
// count and runs the registered handler.
//
// Key Features:
// - Exact, case-sensitive name match ending at whitespace or end of text
// - Usage reply instead of invocation when too few arguments are given
// - Per-dispatch UUID carried through every log line
//
// Used by: main.rs (message event)

use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::commands::pagination::HelpSessions;
use crate::commands::registry::{CommandDescriptor, CommandId, CommandRegistry};
use crate::commands::{CommandContext, CommandSettings};
use crate::error::BotError;
use crate::gateway::{Gateway, IncomingMessage};

/// A matched command and its whitespace-separated arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: CommandId,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not addressed to any registered command
    Ignored,
    UsageReported(CommandId),
    Invoked(CommandId),
}

pub fn check_arguments(descriptor: &CommandDescriptor, given: usize) -> Result<(), BotError> {
    let required = descriptor.min_args();
    if given < required {
        return Err(BotError::InsufficientArguments {
            name: descriptor.name.clone(),
            required,
            given,
        });
    }
    Ok(())
}

pub fn usage_reply(prefix: &str, descriptor: &CommandDescriptor) -> String {
    format!("Not enough arguments! Usage: `{}{}`", prefix, descriptor.usage())
}

pub struct CommandDispatcher {
    settings: Arc<CommandSettings>,
    registry: Arc<CommandRegistry>,
    sessions: Arc<HelpSessions>,
}

impl CommandDispatcher {
    pub fn new(settings: Arc<CommandSettings>, registry: Arc<CommandRegistry>, sessions: Arc<HelpSessions>) -> Self {
        Self {
            settings,
            registry,
            sessions,
        }
    }

    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &HelpSessions {
        &self.sessions
    }

    pub fn parse(&self, text: &str) -> Option<Invocation> {
        let rest = text.strip_prefix(self.settings.prefix.as_str())?;
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, tail) = rest.split_at(name_end);
        if name.is_empty() {
            return None;
        }

        let descriptor = self.registry.lookup_by_invocation_name(name)?;
        Some(Invocation {
            command: descriptor.id,
            args: tail.split_whitespace().map(str::to_string).collect(),
        })
    }

    pub async fn dispatch(&self, gateway: &dyn Gateway, message: &IncomingMessage) -> Result<DispatchOutcome, BotError> {
        let invocation = match self.parse(&message.content) {
            Some(invocation) => invocation,
            None => return Ok(DispatchOutcome::Ignored),
        };
        let (descriptor, handler) = match (
            self.registry.lookup(invocation.command),
            self.registry.handler(invocation.command),
        ) {
            (Some(descriptor), Some(handler)) => (descriptor, handler),
            _ => return Ok(DispatchOutcome::Ignored),
        };

        let trace_id = Uuid::new_v4().to_string();
        debug!(
            "[{}] {} invoked `{}` with {} argument(s)",
            trace_id,
            message.author_id,
            descriptor.id,
            invocation.args.len()
        );

        if let Err(error) = check_arguments(descriptor, invocation.args.len()) {
            info!("[{}] {}", trace_id, error);
            let reply = usage_reply(&self.settings.prefix, descriptor);
            gateway.send_text(message.channel_id, &reply).await?;
            return Ok(DispatchOutcome::UsageReported(descriptor.id));
        }

        let ctx = CommandContext {
            gateway,
            registry: &self.registry,
            sessions: &self.sessions,
            settings: &self.settings,
            descriptor,
            trace_id: &trace_id,
        };
        handler.execute(&ctx, message, &invocation.args).await?;
        debug!("[{}] `{}` completed", trace_id, descriptor.id);
        Ok(DispatchOutcome::Invoked(descriptor.id))
    }
}
