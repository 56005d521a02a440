mod game;
mod roles;
mod session;
mod view;
mod vote;

pub use roles::{assign_impostors, default_name, pick_starting_player, resolve_names};
pub use session::{validate_config, AdvanceOutcome, Session};
pub use view::{Candidate, PhaseView, Reveal, RoleCard};
pub use vote::VoteResult;

use crate::feedback::{CueFeedback, FanoutFeedback, FeedbackSink, LogFeedback};
use crate::protocol::ServerMessage;
use crate::types::*;
use crate::words::{MatureGate, WordResolver, WordSourceError};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Rule violations reported by the session. The session is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    ConfigInvalid(String),

    #[error("Cannot {action} during {phase:?}")]
    InvalidAction { action: &'static str, phase: Phase },

    #[error("Player {index} does not exist ({count} players)")]
    PlayerOutOfRange { index: PlayerIndex, count: usize },

    #[error("Player {0} was already accused this round")]
    AlreadyAccused(PlayerIndex),

    #[error("The round is over")]
    RoundOver,

    #[error("A secret word is being generated")]
    Busy,
}

impl GameError {
    /// Errors the players can fix themselves, as opposed to out-of-order intents
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, GameError::ConfigInvalid(_))
    }
}

/// Why a game could not be started
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("A secret word is already being generated")]
    Busy,

    #[error(transparent)]
    Config(#[from] GameError),

    #[error(transparent)]
    Word(#[from] WordSourceError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub words: Arc<WordResolver>,
    pub feedback: Arc<dyn FeedbackSink>,
    pub mature_gate: Arc<RwLock<MatureGate>>,
    /// Set while a generated word is in flight
    pub word_pending: Arc<AtomicBool>,
    /// Broadcast channel for cues and status updates to every connected screen
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(session: Session, words: WordResolver) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        let feedback: Arc<dyn FeedbackSink> = Arc::new(FanoutFeedback::new(vec![
            Arc::new(CueFeedback::new(tx.clone())),
            Arc::new(LogFeedback),
        ]));
        Self {
            session: Arc::new(RwLock::new(session)),
            words: Arc::new(words),
            feedback,
            mature_gate: Arc::new(RwLock::new(MatureGate::default())),
            word_pending: Arc::new(AtomicBool::new(false)),
            broadcast: tx,
        }
    }

    /// Replace the feedback sink
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Send a message to every connected screen
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // Ignore send errors (no receivers connected is fine)
        let _ = self.broadcast.send(msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Session::new(GameLimits::default()), WordResolver::local_only())
    }
}
