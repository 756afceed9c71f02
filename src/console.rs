// console.rs - Operator Console
// Reads commands from stdin while the bot runs so the operator can check on it
// or stop it without Ctrl+C.
//
// Used by: main.rs (spawned next to the Discord client)

use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use crate::commands::dispatcher::CommandDispatcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Quit,
    Help,
    Status,
    Empty,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let command = line.trim().to_lowercase();
        match command.as_str() {
            "quit" | "q" | "exit" => ConsoleCommand::Quit,
            "help" | "h" => ConsoleCommand::Help,
            "status" => ConsoleCommand::Status,
            "" => ConsoleCommand::Empty,
            _ => ConsoleCommand::Unknown(command),
        }
    }
}

pub async fn status_lines(dispatcher: &CommandDispatcher) -> Vec<String> {
    let help_page = match dispatcher.sessions().current().await {
        Some(session) => {
            let state = session.page.lock().await;
            format!(
                "message {} in channel {}, showing {} of {} commands",
                session.message.message_id,
                session.message.channel_id,
                state.shown().len(),
                state.all_commands().len()
            )
        }
        None => "none".to_string(),
    };
    vec![
        "🤖 Bot Status: Running".to_string(),
        format!("📋 Registered commands: {}", dispatcher.registry().count()),
        format!("🔤 Prefix: '{}'", dispatcher.settings().prefix),
        format!("📖 Navigable help page: {}", help_page),
    ]
}

pub async fn handle_command_line(shutdown_tx: mpsc::Sender<String>, dispatcher: Arc<CommandDispatcher>) {
    println!("📝 Command line interface active. Type 'help' for available commands.");

    // Let the connection banners print first
    sleep(Duration::from_millis(1500)).await;

    let mut reader = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    if stdout.write_all(b"\n> ").await.is_err() || stdout.flush().await.is_err() {
        eprintln!("❌ Failed to write initial prompt");
        return;
    }

    loop {
        let line = match reader.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("❌ Error reading command line: {}", e);
                break;
            }
        };

        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => {
                println!("⏹️  Shutting down bot...");
                if shutdown_tx.send("quit".to_string()).await.is_err() {
                    eprintln!("❌ Failed to send shutdown signal");
                }
                break;
            }
            ConsoleCommand::Help => {
                println!("🤖 Available commands:");
                println!("  quit, q, exit  - Stop the bot gracefully");
                println!("  help, h        - Show this help message");
                println!("  status         - Show bot status");
            }
            ConsoleCommand::Status => {
                for line in status_lines(&dispatcher).await {
                    println!("{}", line);
                }
            }
            ConsoleCommand::Empty => {}
            ConsoleCommand::Unknown(command) => {
                println!("❓ Unknown command: '{}'. Type 'help' for available commands.", command);
            }
        }

        if stdout.write_all(b"> ").await.is_err() || stdout.flush().await.is_err() {
            eprintln!("❌ Failed to write prompt");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::builtin_registry;
    use crate::commands::pagination::{HelpPaginationState, HelpSessions};
    use crate::commands::testing::settings;
    use crate::gateway::MessageHandle;
    use serenity::model::id::{ChannelId, MessageId};

    #[test]
    fn test_parse_console_commands() {
        assert_eq!(ConsoleCommand::parse("  QUIT "), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("q"), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("exit"), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("h"), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse("status"), ConsoleCommand::Status);
        assert_eq!(ConsoleCommand::parse("   "), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse("reboot"), ConsoleCommand::Unknown("reboot".to_string()));
    }

    #[tokio::test]
    async fn test_status_reports_help_page() {
        let sessions = Arc::new(HelpSessions::new());
        let dispatcher = CommandDispatcher::new(
            Arc::new(settings()),
            Arc::new(builtin_registry().unwrap()),
            Arc::clone(&sessions),
        );

        let lines = status_lines(&dispatcher).await;
        assert_eq!(lines[1], "📋 Registered commands: 9");
        assert_eq!(lines[2], "🔤 Prefix: '^'");
        assert_eq!(lines[3], "📖 Navigable help page: none");

        let handle = MessageHandle::new(ChannelId(42), MessageId(1000));
        let listed = dispatcher.registry().listed();
        sessions.install(HelpPaginationState::bind(handle, listed)).await;
        let lines = status_lines(&dispatcher).await;
        assert_eq!(
            lines[3],
            "📖 Navigable help page: message 1000 in channel 42, showing 6 of 8 commands"
        );
    }
}
