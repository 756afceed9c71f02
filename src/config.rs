// config.rs - Bot Configuration
// Reads botconfig.txt (KEY=VALUE lines) from the first location that has one.
//
// Key Features:
// - Multi-path fallback: ., .., ../.., src/
// - BOM stripping and # comments
// - Token placeholder rejected, prefix validated
//
// Used by: main.rs (startup)

use std::collections::HashMap;
use std::fs;

use crate::error::BotError;

pub const CONFIG_PATHS: [&str; 4] = [
    "botconfig.txt",
    "../botconfig.txt",
    "../../botconfig.txt",
    "src/botconfig.txt",
];

pub const DEFAULT_PREFIX: &str = "^";
pub const DEFAULT_BOT_NAME: &str = "Helper";
const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN_HERE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub discord_token: String,
    pub prefix: String,
    pub bot_name: String,
}

impl BotConfig {
    pub fn from_entries(entries: &HashMap<String, String>) -> Result<Self, BotError> {
        let discord_token = match entries.get("DISCORD_TOKEN") {
            Some(token) if token.is_empty() || token == TOKEN_PLACEHOLDER => {
                return Err(BotError::Config(
                    "DISCORD_TOKEN in botconfig.txt is set to placeholder! Replace with your actual Discord bot token."
                        .to_string(),
                ));
            }
            Some(token) => token.clone(),
            None => return Err(BotError::Config("DISCORD_TOKEN not found in botconfig.txt file!".to_string())),
        };

        let prefix = entries
            .get("PREFIX")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(BotError::Config(format!(
                "PREFIX '{}' must be non-empty and contain no whitespace",
                prefix
            )));
        }

        let bot_name = entries
            .get("BOT_NAME")
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string());

        Ok(Self {
            discord_token,
            prefix,
            bot_name,
        })
    }
}

/// Parse KEY=VALUE lines; blank lines, comments and lines without `=` are skipped
pub fn parse_entries(content: &str) -> HashMap<String, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    entries
}

/// Load from the first botconfig.txt found; returns the path that was used
pub fn load_bot_config() -> Result<(BotConfig, &'static str), BotError> {
    for config_path in CONFIG_PATHS {
        match fs::read_to_string(config_path) {
            Ok(content) => {
                let config = BotConfig::from_entries(&parse_entries(&content))?;
                return Ok((config, config_path));
            }
            Err(_) => continue,
        }
    }

    Err(BotError::Config(
        "No botconfig.txt file found in any expected location (., .., ../.., src/)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_bom() {
        let entries = parse_entries("\u{feff}# bot settings\nDISCORD_TOKEN = abc=def\n\nPREFIX=!\nnot a pair\n");
        assert_eq!(entries.get("DISCORD_TOKEN").map(String::as_str), Some("abc=def"));
        assert_eq!(entries.get("PREFIX").map(String::as_str), Some("!"));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_defaults_apply() {
        let config = BotConfig::from_entries(&parse_entries("DISCORD_TOKEN=abc")).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.prefix, "^");
        assert_eq!(config.bot_name, "Helper");
    }

    #[test]
    fn test_custom_prefix_and_name() {
        let config = BotConfig::from_entries(&parse_entries("DISCORD_TOKEN=abc\nPREFIX=bot!\nBOT_NAME=Meri")).unwrap();
        assert_eq!(config.prefix, "bot!");
        assert_eq!(config.bot_name, "Meri");
    }

    #[test]
    fn test_missing_or_placeholder_token_is_rejected() {
        assert!(matches!(BotConfig::from_entries(&parse_entries("PREFIX=^")), Err(BotError::Config(_))));
        assert!(matches!(
            BotConfig::from_entries(&parse_entries("DISCORD_TOKEN=YOUR_BOT_TOKEN_HERE")),
            Err(BotError::Config(_))
        ));
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let result = BotConfig::from_entries(&parse_entries("DISCORD_TOKEN=abc\nPREFIX="));
        assert!(matches!(result, Err(BotError::Config(message)) if message.contains("PREFIX")));
    }
}
