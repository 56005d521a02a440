//! WebSocket message dispatch
//!
//! Every intent is forwarded to [`AppState`]. On success the requester gets
//! the fresh view back; errors are mapped to protocol error codes.

use crate::protocol::{self, ClientMessage, ServerMessage};
use crate::state::{AppState, GameError, StartError};
use crate::words::WordSourceError;
use std::sync::Arc;

/// Protocol error for a rule violation
fn game_error(e: GameError) -> ServerMessage {
    if e == GameError::Busy {
        tracing::warn!("Intent rejected: word generation in progress");
        ServerMessage::error(protocol::BUSY, e.to_string())
    } else if e.is_user_correctable() {
        tracing::warn!("Rejected configuration: {}", e);
        ServerMessage::error(protocol::CONFIG_INVALID, e.to_string())
    } else {
        tracing::error!("Invalid action: {}", e);
        ServerMessage::error(protocol::INVALID_ACTION, e.to_string())
    }
}

fn start_error(e: StartError) -> ServerMessage {
    match e {
        StartError::Busy => {
            tracing::warn!("Start rejected: word generation in progress");
            ServerMessage::error(protocol::BUSY, StartError::Busy.to_string())
        }
        StartError::Config(e) => game_error(e),
        StartError::Word(e) if e.is_config_error() => {
            tracing::warn!("Word source rejected the request: {}", e);
            ServerMessage::error(protocol::CONFIG_INVALID, e.to_string())
        }
        StartError::Word(e) => {
            if let WordSourceError::Rejected(reason) = &e {
                tracing::warn!("Topic rejected: {}", reason);
            } else {
                tracing::error!("Word source failed: {}", e);
            }
            ServerMessage::error(protocol::WORD_SOURCE_FAILED, e.to_string())
        }
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    let result: Result<(), ServerMessage> = match msg {
        ClientMessage::StartGame { config, word } => {
            tracing::info!(
                "Start requested: {} players, {} impostor(s), word {:?}",
                config.player_count,
                config.impostor_count,
                word
            );
            state.start_game(config, word).await.map_err(start_error)
        }

        ClientMessage::RevealRole => state.reveal_role().await.map(|_| ()).map_err(game_error),

        ClientMessage::Advance => state.advance().await.map(|_| ()).map_err(game_error),

        ClientMessage::ProceedToVoting => state.proceed_to_voting().await.map_err(game_error),

        ClientMessage::CastVote { index } => {
            state.cast_vote(index).await.map(|_| ()).map_err(game_error)
        }

        ClientMessage::ContinueVoting => state.continue_voting().await.map_err(game_error),

        ClientMessage::ResetGame => state.reset_game().await.map_err(game_error),

        // Gate updates go out as broadcasts, so the requester needs nothing extra
        ClientMessage::RequestMatureCategory => {
            return state.request_mature_category().await.err().map(game_error);
        }

        ClientMessage::ConfirmMatureCategory => {
            return state.confirm_mature_category().await.err().map(game_error);
        }

        ClientMessage::CancelMatureCategory => {
            return state.cancel_mature_category().await.err().map(game_error);
        }

        ClientMessage::Sync => Ok(()),
    };

    match result {
        Ok(()) => Some(state.view_message().await),
        Err(error) => Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PhaseView, Session};
    use crate::types::*;
    use crate::words::{MatureGate, WordRequest, WordResolver};
    use std::sync::atomic::Ordering;

    fn test_state(seed: u64) -> Arc<AppState> {
        Arc::new(AppState::new(
            Session::with_seed(GameLimits::default(), seed),
            WordResolver::local_only(),
        ))
    }

    fn start(player_count: usize, impostor_count: usize, word: &str) -> ClientMessage {
        ClientMessage::StartGame {
            config: GameConfig {
                player_count,
                impostor_count,
                names: Vec::new(),
            },
            word: WordRequest::Manual {
                word: word.to_string(),
            },
        }
    }

    fn error_code(msg: Option<ServerMessage>) -> String {
        match msg {
            Some(ServerMessage::Error { code, .. }) => code,
            other => panic!("expected an error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_returns_first_card() {
        let state = test_state(1);
        match handle_message(start(4, 1, "APPLE"), &state).await {
            Some(ServerMessage::View {
                view: PhaseView::ViewingRole { card, .. },
                ..
            }) => assert_eq!(card.viewer_index, 0),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_config_errors_map_to_config_invalid() {
        let state = test_state(1);
        assert_eq!(
            error_code(handle_message(start(1, 1, "APPLE"), &state).await),
            protocol::CONFIG_INVALID
        );
        assert_eq!(
            error_code(handle_message(start(4, 1, "   "), &state).await),
            protocol::CONFIG_INVALID
        );
    }

    #[tokio::test]
    async fn test_out_of_order_intent_is_invalid_action() {
        let state = test_state(1);
        assert_eq!(
            error_code(handle_message(ClientMessage::CastVote { index: 0 }, &state).await),
            protocol::INVALID_ACTION
        );
        assert_eq!(
            error_code(handle_message(ClientMessage::ContinueVoting, &state).await),
            protocol::INVALID_ACTION
        );
        assert_eq!(state.session.read().await.phase(), Phase::Start);
    }

    #[tokio::test]
    async fn test_generated_word_without_providers_fails_word_source() {
        let state = test_state(1);
        let msg = ClientMessage::StartGame {
            config: GameConfig {
                player_count: 3,
                impostor_count: 1,
                names: Vec::new(),
            },
            word: WordRequest::Generated {
                topic: "space".to_string(),
            },
        };
        assert_eq!(
            error_code(handle_message(msg, &state).await),
            protocol::WORD_SOURCE_FAILED
        );
    }

    #[tokio::test]
    async fn test_mature_gate_intents_broadcast() {
        let state = test_state(1);
        let mut rx = state.broadcast.subscribe();

        assert!(handle_message(ClientMessage::RequestMatureCategory, &state)
            .await
            .is_none());
        match rx.recv().await.unwrap() {
            ServerMessage::MatureGate { state } => assert_eq!(state, MatureGate::FirstWarning),
            other => panic!("unexpected broadcast {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_intents_while_word_pending_are_busy() {
        let state = test_state(1);
        state.word_pending.store(true, Ordering::SeqCst);

        assert_eq!(
            error_code(handle_message(ClientMessage::ResetGame, &state).await),
            protocol::BUSY
        );
        assert_eq!(
            error_code(handle_message(ClientMessage::RequestMatureCategory, &state).await),
            protocol::BUSY
        );
        assert_eq!(
            error_code(handle_message(start(3, 1, "APPLE"), &state).await),
            protocol::BUSY
        );

        match handle_message(ClientMessage::Sync, &state).await {
            Some(ServerMessage::View { valid_intents, .. }) => assert!(valid_intents.is_empty()),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sync_returns_view() {
        let state = test_state(1);
        assert!(matches!(
            handle_message(ClientMessage::Sync, &state).await,
            Some(ServerMessage::View { .. })
        ));
    }

    #[tokio::test]
    async fn test_reset_from_anywhere() {
        let state = test_state(1);
        handle_message(start(3, 1, "APPLE"), &state).await;
        handle_message(ClientMessage::Advance, &state).await;

        match handle_message(ClientMessage::ResetGame, &state).await {
            Some(ServerMessage::View {
                game_id,
                view: PhaseView::Start { saved_config, .. },
                ..
            }) => {
                assert!(game_id.is_none());
                assert_eq!(saved_config.map(|c| c.player_count), Some(3));
            }
            other => panic!("unexpected response {:?}", other),
        }
    }
}
