// registry.rs - Command Registry
// Holds every command the bot knows about, in registration order. That order is
// also the order commands appear on the paginated help page.
//
// Key Features:
// - Stable identifiers and unique invocation names (names + aliases)
// - Explicit category tag, with ACTION commands kept off the paginated listing
// - Read-only after startup, shared through an Arc
//
// Used by: commands/dispatcher.rs, commands/help.rs, commands/navigation.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::commands::CommandHandler;
use crate::error::BotError;

// ============================================================================
// DESCRIPTOR TYPES
// ============================================================================

/// Opaque command identifier, stable for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(&'static str);

impl CommandId {
    pub const fn new(key: &'static str) -> Self {
        CommandId(key)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Where a command is filed on the help page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    Administration,
    BotAdministrator,
    Music,
    Info,
    Leveling,
    Settings,
    Fun,
    #[default]
    Other,
    /// Only reachable through `help <command>`, never listed on a page
    Action,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 9] = [
        CommandCategory::Administration,
        CommandCategory::BotAdministrator,
        CommandCategory::Music,
        CommandCategory::Info,
        CommandCategory::Leveling,
        CommandCategory::Settings,
        CommandCategory::Fun,
        CommandCategory::Other,
        CommandCategory::Action,
    ];

    /// Case-insensitive match on the label, ignoring spaces and underscores
    pub fn from_label(label: &str) -> Option<CommandCategory> {
        let wanted: String = label
            .chars()
            .filter(|c| *c != ' ' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL.into_iter().find(|category| {
            let candidate: String = category
                .to_string()
                .chars()
                .filter(|c| *c != ' ')
                .flat_map(char::to_lowercase)
                .collect();
            candidate == wanted
        })
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandCategory::Administration => "Commands related with administration.",
            CommandCategory::BotAdministrator => "Commands only for bot administrators.",
            CommandCategory::Music => "Commands related with playing music.",
            CommandCategory::Info => "Commands which give information.",
            CommandCategory::Leveling => "Leveling commands. Somewhat useless.",
            CommandCategory::Settings => "Commands that are used for settings/configurations.",
            CommandCategory::Fun => "Random commands for fun.",
            CommandCategory::Other => "Other commands which do not fit in any of the above categories.",
            CommandCategory::Action => "Action commands, only described through the help command.",
        }
    }

    pub fn is_listed(self) -> bool {
        self != CommandCategory::Action
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            CommandCategory::Administration => "Administration",
            CommandCategory::BotAdministrator => "Bot Administrator",
            CommandCategory::Music => "Music",
            CommandCategory::Info => "Info",
            CommandCategory::Leveling => "Leveling",
            CommandCategory::Settings => "Settings",
            CommandCategory::Fun => "Fun",
            CommandCategory::Other => "Other",
            CommandCategory::Action => "Action",
        };
        f.write_str(label)
    }
}

/// A positional argument a command declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgument {
    pub name: String,
    pub required: bool,
}

/// Metadata for one command. Built once, then frozen inside the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub category: CommandCategory,
    pub arguments: Vec<CommandArgument>,
    /// Sub-operations (`name`, `description`) shown on the detail view
    pub actions: Vec<(String, String)>,
}

impl CommandDescriptor {
    pub fn new(id: CommandId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            category: CommandCategory::default(),
            arguments: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn category(mut self, category: CommandCategory) -> Self {
        self.category = category;
        self
    }

    /// Declare a required argument, shown as `<name>`
    pub fn argument(mut self, name: &str) -> Self {
        self.arguments.push(CommandArgument {
            name: name.to_string(),
            required: true,
        });
        self
    }

    /// Declare an optional argument, shown as `[name]`
    pub fn optional_argument(mut self, name: &str) -> Self {
        self.arguments.push(CommandArgument {
            name: name.to_string(),
            required: false,
        });
        self
    }

    /// Name followed by the declared arguments, without the prefix
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for argument in &self.arguments {
            if argument.required {
                usage.push_str(&format!(" <{}>", argument.name));
            } else {
                usage.push_str(&format!(" [{}]", argument.name));
            }
        }
        usage
    }

    /// Number of required arguments
    pub fn min_args(&self) -> usize {
        self.arguments.iter().filter(|argument| argument.required).count()
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn action(mut self, name: &str, description: &str) -> Self {
        self.actions.push((name.to_string(), description.to_string()));
        self
    }

    /// Name first, then aliases
    pub fn invocation_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: Arc<dyn CommandHandler>,
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    by_id: HashMap<CommandId, usize>,
    by_name: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Fails without touching the registry when the id or any
    /// invocation name is already taken.
    pub fn register(&mut self, descriptor: CommandDescriptor, handler: Arc<dyn CommandHandler>) -> Result<(), BotError> {
        if self.by_id.contains_key(&descriptor.id) {
            return Err(BotError::DuplicateIdentifier(descriptor.id));
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in descriptor.invocation_names() {
            if self.by_name.contains_key(name) || seen.contains(&name) {
                return Err(BotError::DuplicateInvocationName(name.to_string()));
            }
            seen.push(name);
        }

        let index = self.commands.len();
        self.by_id.insert(descriptor.id, index);
        for name in descriptor.invocation_names() {
            self.by_name.insert(name.to_string(), index);
        }
        debug!("registered command `{}` as #{}", descriptor.id, index);
        self.commands.push(RegisteredCommand { descriptor, handler });
        Ok(())
    }

    pub fn lookup(&self, id: CommandId) -> Option<&CommandDescriptor> {
        self.by_id.get(&id).map(|&index| &self.commands[index].descriptor)
    }

    /// Exact, case-sensitive match against names and aliases
    pub fn lookup_by_invocation_name(&self, name: &str) -> Option<&CommandDescriptor> {
        self.by_name.get(name).map(|&index| &self.commands[index].descriptor)
    }

    pub fn handler(&self, id: CommandId) -> Option<Arc<dyn CommandHandler>> {
        self.by_id
            .get(&id)
            .map(|&index| Arc::clone(&self.commands[index].handler))
    }

    /// All descriptors in registration order
    pub fn enumerate(&self) -> impl ExactSizeIterator<Item = &CommandDescriptor> {
        self.commands.iter().map(|command| &command.descriptor)
    }

    /// Ids that belong on the paginated listing, in registration order
    pub fn listed(&self) -> Vec<CommandId> {
        self.enumerate()
            .filter(|descriptor| descriptor.category.is_listed())
            .map(|descriptor| descriptor.id)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.commands.len()
    }
}
