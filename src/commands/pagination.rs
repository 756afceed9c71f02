// pagination.rs - Help Page Window State
// Tracks which slice of the command listing a help message is showing and which
// help message is the one that can still be navigated.
//
// Key Features:
// - Fixed page size of 6 commands
// - Back/forward window walks over a registration-order snapshot
// - Single process-wide current session; installing a new one makes the old
//   message stale
//
// Used by: commands/help.rs (install), commands/navigation.rs (turn pages)

use std::sync::Arc;

use log::debug;
use tokio::sync::{Mutex, RwLock};

use crate::commands::registry::CommandId;
use crate::error::BotError;
use crate::gateway::MessageHandle;

pub const PAGE_SIZE: usize = 6;

pub const BACK_SYMBOL: &str = "⬅️";
pub const FORWARD_SYMBOL: &str = "➡️";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    pub fn from_symbol(symbol: &str) -> Option<Direction> {
        match symbol {
            BACK_SYMBOL => Some(Direction::Back),
            FORWARD_SYMBOL => Some(Direction::Forward),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Back => BACK_SYMBOL,
            Direction::Forward => FORWARD_SYMBOL,
        }
    }
}

/// Result of walking the window one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTurn {
    /// Re-render the bound message with these ids, in registry order
    Render(Vec<CommandId>),
    /// Leave the message as it is
    Abort,
}

pub fn first_page(all_commands: &[CommandId]) -> Vec<CommandId> {
    all_commands.iter().take(PAGE_SIZE).copied().collect()
}

// ============================================================================
// PER-MESSAGE STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct HelpPaginationState {
    message: MessageHandle,
    all_commands: Vec<CommandId>,
    // Always a subset of all_commands, kept in registry order
    shown: Vec<CommandId>,
}

impl HelpPaginationState {
    /// Bind a freshly rendered help message; the first page counts as shown
    pub fn bind(message: MessageHandle, all_commands: Vec<CommandId>) -> Self {
        let shown = first_page(&all_commands);
        Self {
            message,
            all_commands,
            shown,
        }
    }

    pub fn message(&self) -> MessageHandle {
        self.message
    }

    pub fn all_commands(&self) -> &[CommandId] {
        &self.all_commands
    }

    pub fn shown(&self) -> &[CommandId] {
        &self.shown
    }

    pub fn turn(&mut self, direction: Direction) -> PageTurn {
        match direction {
            Direction::Back => self.turn_back(),
            Direction::Forward => self.turn_forward(),
        }
    }

    fn turn_back(&mut self) -> PageTurn {
        let mut page = Vec::new();
        for id in &self.all_commands {
            if let Some(index) = self.shown.iter().position(|shown| shown == id) {
                self.shown.remove(index);
                if page.len() < PAGE_SIZE {
                    page.push(*id);
                }
            }
        }

        if self.shown.is_empty() {
            return PageTurn::Abort;
        }
        PageTurn::Render(page)
    }

    fn turn_forward(&mut self) -> PageTurn {
        let start = self
            .shown
            .iter()
            .filter_map(|id| self.all_commands.iter().position(|candidate| candidate == id))
            .max()
            .map_or(0, |last| last + 1);

        let page: Vec<CommandId> = self.all_commands[start..]
            .iter()
            .filter(|id| !self.shown.contains(id))
            .take(PAGE_SIZE)
            .copied()
            .collect();

        if page.is_empty() {
            return PageTurn::Abort;
        }

        self.shown = page.clone();
        if self.shown.len() == self.all_commands.len() {
            return PageTurn::Abort;
        }
        PageTurn::Render(page)
    }
}

// ============================================================================
// CURRENT SESSION SLOT
// ============================================================================

/// A help message together with its state. Clones share the same state.
#[derive(Debug, Clone)]
pub struct NavigationSession {
    pub message: MessageHandle,
    pub page: Arc<Mutex<HelpPaginationState>>,
}

#[derive(Debug, Default)]
pub struct HelpSessions {
    current: RwLock<Option<NavigationSession>>,
}

impl HelpSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `state` the navigable help page, superseding any previous one
    pub async fn install(&self, state: HelpPaginationState) -> NavigationSession {
        let session = NavigationSession {
            message: state.message(),
            page: Arc::new(Mutex::new(state)),
        };
        let previous = self.current.write().await.replace(session.clone());
        if let Some(previous) = previous {
            debug!(
                "help message {} superseded by {}",
                previous.message.message_id, session.message.message_id
            );
        }
        session
    }

    /// Session for `message`, if it is the current one
    pub async fn bound_to(&self, message: MessageHandle) -> Result<NavigationSession, BotError> {
        match self.current.read().await.as_ref() {
            Some(session) if session.message == message => Ok(session.clone()),
            _ => Err(BotError::StaleNavigationSession(message.message_id)),
        }
    }

    pub async fn is_current(&self, session: &NavigationSession) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map_or(false, |current| Arc::ptr_eq(&current.page, &session.page))
    }

    /// Drop `session` if it is still the current one
    pub async fn retire(&self, session: &NavigationSession) {
        let mut current = self.current.write().await;
        let is_same = current
            .as_ref()
            .map_or(false, |active| Arc::ptr_eq(&active.page, &session.page));
        if is_same {
            *current = None;
            debug!("help message {} retired", session.message.message_id);
        }
    }

    /// Stop navigation on whichever help page is current
    pub async fn close(&self) -> Option<MessageHandle> {
        let closed = self.current.write().await.take().map(|session| session.message);
        if let Some(message) = closed {
            debug!("help message {} closed", message.message_id);
        }
        closed
    }

    pub async fn current(&self) -> Option<NavigationSession> {
        self.current.read().await.clone()
    }

    pub async fn current_message(&self) -> Option<MessageHandle> {
        self.current.read().await.as_ref().map(|session| session.message)
    }
}
