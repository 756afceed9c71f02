// navigation.rs - Help Page Reaction Navigation
// Turns ⬅️/➡️ clicks on the current help message into page changes.
//
// Key Features:
// - Ignores the bot's own reactions and any other emoji
// - Clicks on superseded help messages are silent no-ops
// - One click cycle at a time per help message (state mutex held through the edit)
// - A deleted help message ends its session
// - A page that fails to render leaves the window where it was
//
// Used by: main.rs (reaction_add event)

use std::sync::Arc;

use futures_util::StreamExt;
use log::{debug, warn};
use serenity::model::id::UserId;

use crate::commands::help::render_page;
use crate::commands::pagination::{Direction, HelpPaginationState, HelpSessions, PageTurn};
use crate::commands::registry::CommandRegistry;
use crate::commands::CommandSettings;
use crate::error::BotError;
use crate::gateway::{Gateway, MessageHandle, ReactionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Not a navigation symbol, or the bot's own reaction
    Ignored,
    /// The reaction landed on a help message that is no longer current
    Stale,
    /// Every pending click was processed
    Applied { rendered: usize, aborted: usize },
    /// A gateway call failed part way through
    Abandoned,
}

pub struct ReactionNavigator {
    registry: Arc<CommandRegistry>,
    sessions: Arc<HelpSessions>,
    settings: Arc<CommandSettings>,
}

impl ReactionNavigator {
    pub fn new(registry: Arc<CommandRegistry>, sessions: Arc<HelpSessions>, settings: Arc<CommandSettings>) -> Self {
        Self {
            registry,
            sessions,
            settings,
        }
    }

    pub async fn on_reaction_add(&self, gateway: &dyn Gateway, event: &ReactionEvent) -> NavigationOutcome {
        let direction = match Direction::from_symbol(&event.symbol) {
            Some(direction) => direction,
            None => return NavigationOutcome::Ignored,
        };

        let bot_id = gateway.current_user_id();
        if event.actor == bot_id {
            return NavigationOutcome::Ignored;
        }

        let session = match self.sessions.bound_to(event.message).await {
            Ok(session) => session,
            Err(error) => {
                debug!("{}", error);
                return NavigationOutcome::Stale;
            }
        };

        let mut state = session.page.lock().await;
        // A newer help page may have been installed while we waited for the lock
        if !self.sessions.is_current(&session).await {
            debug!("help message {} went stale while waiting", event.message.message_id);
            return NavigationOutcome::Stale;
        }

        let result = self
            .apply_clicks(gateway, &mut state, direction, event.message, bot_id)
            .await;
        drop(state);

        match result {
            Ok((rendered, aborted)) => {
                debug!(
                    "help message {}: {:?} rendered {} page(s), aborted {}",
                    event.message.message_id, direction, rendered, aborted
                );
                NavigationOutcome::Applied { rendered, aborted }
            }
            Err(error) if error.is_terminal_for_session() => {
                warn!("Ending help session: {}", error);
                self.sessions.retire(&session).await;
                NavigationOutcome::Abandoned
            }
            Err(error) => {
                warn!("Dropping {} click on help message {}: {}", direction.symbol(), event.message.message_id, error);
                NavigationOutcome::Abandoned
            }
        }
    }

    /// Handle every user currently holding `direction`'s reaction, one page turn each
    async fn apply_clicks(
        &self,
        gateway: &dyn Gateway,
        state: &mut HelpPaginationState,
        direction: Direction,
        message: MessageHandle,
        bot_id: UserId,
    ) -> Result<(usize, usize), BotError> {
        let symbol = direction.symbol();
        let mut rendered = 0;
        let mut aborted = 0;

        let mut actors = gateway.reaction_actors(message, symbol);
        while let Some(actor) = actors.next().await {
            let actor = actor?;
            if actor == bot_id {
                continue;
            }

            gateway.remove_reaction(message, symbol, actor).await?;
            let before = state.clone();
            match state.turn(direction) {
                PageTurn::Render(page) => {
                    let embed = render_page(&self.registry, &page, &self.settings);
                    if let Err(error) = gateway.edit_embed(message, &embed).await {
                        *state = before;
                        return Err(error);
                    }
                    rendered += 1;
                }
                PageTurn::Abort => aborted += 1,
            }
        }
        Ok((rendered, aborted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::pagination::{BACK_SYMBOL, FORWARD_SYMBOL};
    use crate::commands::testing::{numbered_registry, settings, NUMBERED_IDS};
    use crate::gateway::testing::{GatewayCall, RecordingGateway};
    use crate::gateway::EmbedContent;
    use serenity::model::id::{ChannelId, MessageId};

    const BOT: UserId = UserId(1);
    const ALICE: UserId = UserId(10);
    const BOB: UserId = UserId(11);
    const CHANNEL: ChannelId = ChannelId(42);

    fn handle(id: u64) -> MessageHandle {
        MessageHandle::new(CHANNEL, MessageId(id))
    }

    fn field_names(embed: &EmbedContent) -> Vec<String> {
        embed.fields.iter().map(|field| field.name.clone()).collect()
    }

    fn expected_names(range: std::ops::Range<usize>) -> Vec<String> {
        NUMBERED_IDS[range].iter().map(|id| format!("`^{}`", id)).collect()
    }

    struct Fixture {
        gateway: RecordingGateway,
        sessions: Arc<HelpSessions>,
        navigator: ReactionNavigator,
    }

    /// Help page for `count` commands bound to message 1000, controls in place
    async fn fixture(count: usize) -> Fixture {
        let registry = Arc::new(numbered_registry(count));
        let sessions = Arc::new(HelpSessions::new());
        let gateway = RecordingGateway::new(BOT);

        sessions
            .install(HelpPaginationState::bind(handle(1000), registry.listed()))
            .await;
        gateway.press(handle(1000), BACK_SYMBOL, BOT);
        gateway.press(handle(1000), FORWARD_SYMBOL, BOT);

        let navigator = ReactionNavigator::new(registry, Arc::clone(&sessions), Arc::new(settings()));
        Fixture {
            gateway,
            sessions,
            navigator,
        }
    }

    async fn click(fixture: &Fixture, message: MessageHandle, symbol: &str, actor: UserId) -> NavigationOutcome {
        fixture.gateway.press(message, symbol, actor);
        let event = ReactionEvent {
            actor,
            message,
            symbol: symbol.to_string(),
        };
        fixture.navigator.on_reaction_add(&fixture.gateway, &event).await
    }

    #[tokio::test]
    async fn test_forward_renders_next_page() {
        let fixture = fixture(20).await;

        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Applied { rendered: 1, aborted: 0 });
        let edits = fixture.gateway.edited_embeds();
        assert_eq!(edits.len(), 1);
        assert_eq!(field_names(&edits[0]), expected_names(6..12));
        assert_eq!(edits[0].title.as_deref(), Some("Helper Help Page"));
        assert!(fixture.gateway.calls().contains(&GatewayCall::RemoveReaction {
            message: handle(1000),
            symbol: FORWARD_SYMBOL.to_string(),
            actor: ALICE,
        }));
        assert_eq!(fixture.gateway.reactors(handle(1000), FORWARD_SYMBOL), vec![BOT]);
    }

    #[tokio::test]
    async fn test_forward_on_last_page_does_not_edit() {
        let fixture = fixture(10).await;

        click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;
        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Applied { rendered: 0, aborted: 1 });
        let edits = fixture.gateway.edited_embeds();
        assert_eq!(edits.len(), 1);
        assert_eq!(field_names(&edits[0]), expected_names(6..10));
        // the click is still consumed
        assert_eq!(fixture.gateway.reactors(handle(1000), FORWARD_SYMBOL), vec![BOT]);
    }

    #[tokio::test]
    async fn test_back_empties_window_without_edit() {
        let fixture = fixture(20).await;

        click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;
        let outcome = click(&fixture, handle(1000), BACK_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Applied { rendered: 0, aborted: 1 });
        assert_eq!(fixture.gateway.edited_embeds().len(), 1);
        let session = fixture.sessions.bound_to(handle(1000)).await.unwrap();
        assert!(session.page.lock().await.shown().is_empty());
    }

    #[tokio::test]
    async fn test_stale_message_is_left_alone() {
        let fixture = fixture(20).await;
        fixture
            .sessions
            .install(HelpPaginationState::bind(handle(2000), NUMBERED_IDS.to_vec()))
            .await;

        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Stale);
        assert!(fixture.gateway.calls().is_empty());
        assert_eq!(fixture.gateway.reactors(handle(1000), FORWARD_SYMBOL), vec![BOT, ALICE]);
    }

    #[tokio::test]
    async fn test_own_and_foreign_reactions_are_ignored() {
        let fixture = fixture(20).await;

        assert_eq!(
            click(&fixture, handle(1000), FORWARD_SYMBOL, BOT).await,
            NavigationOutcome::Ignored
        );
        assert_eq!(click(&fixture, handle(1000), "👍", ALICE).await, NavigationOutcome::Ignored);
        assert!(fixture.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pending_clicks_are_all_consumed() {
        let fixture = fixture(20).await;
        fixture.gateway.press(handle(1000), FORWARD_SYMBOL, BOB);

        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Applied { rendered: 2, aborted: 0 });
        let edits = fixture.gateway.edited_embeds();
        assert_eq!(field_names(&edits[1]), expected_names(12..18));
    }

    #[tokio::test]
    async fn test_deleted_message_ends_session() {
        let fixture = fixture(20).await;
        fixture.gateway.delete_message(MessageId(1000));

        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Abandoned);
        assert_eq!(fixture.sessions.current_message().await, None);
        assert!(fixture.gateway.edited_embeds().is_empty());

        // later clicks on the same message are now stale
        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;
        assert_eq!(outcome, NavigationOutcome::Stale);
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_window_on_the_displayed_page() {
        let fixture = fixture(20).await;
        fixture.gateway.fail_next_edit("rate limited");

        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;

        assert_eq!(outcome, NavigationOutcome::Abandoned);
        assert!(fixture.gateway.edited_embeds().is_empty());
        let session = fixture.sessions.bound_to(handle(1000)).await.unwrap();
        assert_eq!(session.page.lock().await.shown(), &NUMBERED_IDS[..6]);

        // the retry picks up from the page the user can actually see
        let outcome = click(&fixture, handle(1000), FORWARD_SYMBOL, ALICE).await;
        assert_eq!(outcome, NavigationOutcome::Applied { rendered: 1, aborted: 0 });
        assert_eq!(field_names(&fixture.gateway.edited_embeds()[0]), expected_names(6..12));
    }

    #[tokio::test]
    async fn test_concurrent_clicks_apply_in_one_serial_order() {
        let fixture = fixture(20).await;
        fixture.gateway.press(handle(1000), FORWARD_SYMBOL, ALICE);
        fixture.gateway.press(handle(1000), BACK_SYMBOL, BOB);

        let forward = ReactionEvent {
            actor: ALICE,
            message: handle(1000),
            symbol: FORWARD_SYMBOL.to_string(),
        };
        let back = ReactionEvent {
            actor: BOB,
            message: handle(1000),
            symbol: BACK_SYMBOL.to_string(),
        };

        let (first, second) = tokio::join!(
            fixture.navigator.on_reaction_add(&fixture.gateway, &forward),
            fixture.navigator.on_reaction_add(&fixture.gateway, &back)
        );
        assert!(matches!(first, NavigationOutcome::Applied { .. }));
        assert!(matches!(second, NavigationOutcome::Applied { .. }));

        let edits: Vec<Vec<String>> = fixture.gateway.edited_embeds().iter().map(field_names).collect();
        let session = fixture.sessions.bound_to(handle(1000)).await.unwrap();
        let shown = session.page.lock().await.shown().to_vec();

        // forward then back, or back then forward; never a mix of the two
        let forward_first = edits == vec![expected_names(6..12)] && shown.is_empty();
        let back_first = edits == vec![expected_names(0..6)] && shown == NUMBERED_IDS[..6].to_vec();
        assert!(forward_first || back_first, "edits {:?}, shown {:?}", edits, shown);
    }
}
