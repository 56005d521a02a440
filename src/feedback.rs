//! Presentation feedback: clicks, stings and the starting-player narration.
//!
//! Sinks are fire-and-forget. A failing sink never changes game state; the
//! controller goes through [`emit`], which logs the failure and moves on.

use crate::protocol::ServerMessage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackEvent {
    Click,
    GameStarted,
    RoleRevealed,
    VoteCast,
    CorrectAccusation,
    WrongAccusation,
    StartingPlayer { name: String, narration: String },
}

impl FeedbackEvent {
    /// Announcement for the player who opens the debate
    pub fn starting_player(name: &str) -> Self {
        FeedbackEvent::StartingPlayer {
            name: name.to_string(),
            narration: format!(
                "The debate begins! First turn goes to {}. Let's play!",
                name
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feedback sink {sink} failed: {reason}")]
pub struct FeedbackError {
    pub sink: &'static str,
    pub reason: String,
}

/// Something that can play or show feedback events
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, event: &FeedbackEvent) -> Result<(), FeedbackError>;

    fn name(&self) -> &'static str;
}

/// Deliver an event, logging and swallowing any failure
pub fn emit(sink: &dyn FeedbackSink, event: &FeedbackEvent) {
    if let Err(e) = sink.notify(event) {
        tracing::warn!("Feedback sink {} dropped {:?}: {}", sink.name(), event, e);
    }
}

/// Writes events to the log
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn notify(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        match event {
            FeedbackEvent::StartingPlayer { narration, .. } => {
                tracing::info!("Narration: {}", narration)
            }
            other => tracing::debug!("Cue: {:?}", other),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Forwards events to connected presentation clients as `cue` messages
pub struct CueFeedback {
    tx: broadcast::Sender<ServerMessage>,
}

impl CueFeedback {
    pub fn new(tx: broadcast::Sender<ServerMessage>) -> Self {
        Self { tx }
    }
}

impl FeedbackSink for CueFeedback {
    fn notify(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        // No receivers connected is fine
        let _ = self.tx.send(ServerMessage::Cue {
            event: event.clone(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "cue"
    }
}

/// Sends each event to every inner sink, even when one of them fails
pub struct FanoutFeedback {
    sinks: Vec<Arc<dyn FeedbackSink>>,
}

impl FanoutFeedback {
    pub fn new(sinks: Vec<Arc<dyn FeedbackSink>>) -> Self {
        Self { sinks }
    }
}

impl FeedbackSink for FanoutFeedback {
    fn notify(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.notify(event) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "fanout"
    }
}
