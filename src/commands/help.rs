// help.rs - Help Command Module
// Implements the ^help command: a paginated embed listing every command, or a
// detail view for one command when a name is given.
//
// Key Features:
// - Six commands per page, navigated with ⬅️/➡️ reactions
// - Controls only added when the listing spans more than one page
// - ^help <command> shows usage, category, aliases and actions
// - ^help <category> lists every command filed under that category
//
// Used by: commands/mod.rs (registration), commands/navigation.rs (re-rendering)

use async_trait::async_trait;
use log::{debug, info};

use crate::commands::pagination::{first_page, HelpPaginationState, BACK_SYMBOL, FORWARD_SYMBOL, PAGE_SIZE};
use crate::commands::registry::{CommandCategory, CommandDescriptor, CommandId, CommandRegistry};
use crate::commands::{CommandContext, CommandHandler, CommandSettings};
use crate::error::BotError;
use crate::gateway::{EmbedContent, IncomingMessage};

pub const HELP_COLOUR: u32 = 0x0000FF;

pub const HELP_ID: CommandId = CommandId::new("help");

pub fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new(HELP_ID, "help")
        .alias("commands")
        .optional_argument("command|category")
        .description("Lists every command, or shows the details of one command or category.")
        .category(CommandCategory::Info)
}

// ============================================================================
// RENDERING
// ============================================================================

pub fn advisory(prefix: &str) -> String {
    format!("Actions are not listed on this page. To see them, do `{}help <command>`.", prefix)
}

/// Embed for one page of the listing; ids keep the order they are given in
pub fn render_page(registry: &CommandRegistry, page: &[CommandId], settings: &CommandSettings) -> EmbedContent {
    let mut embed = EmbedContent::new()
        .title(format!("{} Help Page", settings.bot_name))
        .description(advisory(&settings.prefix))
        .colour(HELP_COLOUR);

    for descriptor in page.iter().filter_map(|id| registry.lookup(*id)) {
        embed = embed.field(
            format!("`{}{}`", settings.prefix, descriptor.name),
            format!("{}\nUsage: `{}{}`", descriptor.description, settings.prefix, descriptor.usage()),
            false,
        );
    }
    embed
}

pub fn render_details(descriptor: &CommandDescriptor, prefix: &str) -> EmbedContent {
    let mut embed = EmbedContent::new()
        .title(format!("`{}{}`", prefix, descriptor.name))
        .description(descriptor.description.clone())
        .colour(HELP_COLOUR)
        .field("Usage", format!("`{}{}`", prefix, descriptor.usage()), false)
        .field(
            "Category",
            format!("{}: {}", descriptor.category, descriptor.category.description()),
            false,
        );

    if !descriptor.aliases.is_empty() {
        let aliases: Vec<String> = descriptor
            .aliases
            .iter()
            .map(|alias| format!("`{}{}`", prefix, alias))
            .collect();
        embed = embed.field("Aliases", aliases.join(", "), false);
    }

    for (name, description) in &descriptor.actions {
        embed = embed.field(format!("Action: `{}`", name), description.clone(), false);
    }
    embed
}

/// Every registered command filed under `category`, Action commands included
pub fn render_category(registry: &CommandRegistry, category: CommandCategory, settings: &CommandSettings) -> EmbedContent {
    let mut embed = EmbedContent::new()
        .title(format!("{} Commands", category))
        .description(category.description())
        .colour(HELP_COLOUR);

    let mut any = false;
    for descriptor in registry.enumerate().filter(|d| d.category == category) {
        any = true;
        embed = embed.field(
            format!("`{}{}`", settings.prefix, descriptor.name),
            format!("{}\nUsage: `{}{}`", descriptor.description, settings.prefix, descriptor.usage()),
            false,
        );
    }
    if !any {
        embed = embed.field("Nothing here", "No commands are filed under this category yet.", false);
    }
    embed
}

// ============================================================================
// COMMAND IMPLEMENTATION
// ============================================================================

pub struct HelpCommand;

impl HelpCommand {
    async fn show_listing(&self, ctx: &CommandContext<'_>, message: &IncomingMessage) -> Result<(), BotError> {
        let listed = ctx.registry.listed();
        let page = first_page(&listed);
        let embed = render_page(ctx.registry, &page, ctx.settings);
        let sent = ctx.gateway.send_embed(message.channel_id, &embed).await?;

        let needs_controls = listed.len() > PAGE_SIZE;
        info!(
            "[{}] help page {} bound to {} listed command(s)",
            ctx.trace_id,
            sent.handle.message_id,
            listed.len()
        );
        ctx.sessions
            .install(HelpPaginationState::bind(sent.handle, listed))
            .await;

        if needs_controls {
            ctx.gateway.add_reaction(sent.handle, BACK_SYMBOL).await?;
            ctx.gateway.add_reaction(sent.handle, FORWARD_SYMBOL).await?;
        }
        Ok(())
    }

    async fn show_details(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, query: &str) -> Result<(), BotError> {
        let name = query.strip_prefix(ctx.settings.prefix.as_str()).unwrap_or(query);
        match ctx.registry.lookup_by_invocation_name(name) {
            Some(descriptor) => {
                let embed = render_details(descriptor, &ctx.settings.prefix);
                ctx.gateway.send_embed(message.channel_id, &embed).await?;
            }
            None => match CommandCategory::from_label(name) {
                Some(category) => {
                    let embed = render_category(ctx.registry, category, ctx.settings);
                    ctx.gateway.send_embed(message.channel_id, &embed).await?;
                }
                None => {
                    debug!("[{}] help requested for unknown command `{}`", ctx.trace_id, name);
                    let reply = format!("No command or category named `{}` exists.", name);
                    ctx.gateway.send_text(message.channel_id, &reply).await?;
                }
            },
        }
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, message: &IncomingMessage, args: &[String]) -> Result<(), BotError> {
        match args.first() {
            Some(query) => self.show_details(ctx, message, query).await,
            None => self.show_listing(ctx, message).await,
        }
    }
}
