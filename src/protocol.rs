use crate::feedback::FeedbackEvent;
use crate::state::PhaseView;
use crate::types::*;
use crate::words::{MatureGate, WordRequest};
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

/// Error codes sent in [`ServerMessage::Error`]
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const WORD_SOURCE_FAILED: &str = "WORD_SOURCE_FAILED";
pub const BUSY: &str = "BUSY";
pub const INVALID_ACTION: &str = "INVALID_ACTION";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Configure a round and deal the cards
    StartGame {
        config: GameConfig,
        word: WordRequest,
    },
    /// Current viewer flips their card
    RevealRole,
    /// Current viewer hands the device on
    Advance,
    ProceedToVoting,
    CastVote {
        index: PlayerIndex,
    },
    ContinueVoting,
    ResetGame,
    /// Open the adults-only confirmation flow
    RequestMatureCategory,
    ConfirmMatureCategory,
    CancelMatureCategory,
    /// Ask for the current view again (after a reconnect)
    Sync,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        view: PhaseView,
        valid_intents: Vec<Intent>,
        mature_gate: MatureGate,
        server_now: String,
    },
    View {
        game_id: Option<GameId>,
        view: PhaseView,
        valid_intents: Vec<Intent>,
        server_now: String,
    },
    /// A generated word is being fetched; the start button should wait
    WordPending {
        pending: bool,
    },
    MatureGate {
        state: MatureGate,
    },
    Cue {
        event: FeedbackEvent,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }
}
