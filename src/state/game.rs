use super::{AdvanceOutcome, AppState, GameError, RoleCard, Session, StartError, VoteResult};
use crate::feedback::{emit, FeedbackEvent};
use crate::protocol::{ServerMessage, PROTOCOL_VERSION};
use crate::types::*;
use crate::words::{MatureGate, WordRequest};
use std::sync::atomic::Ordering;

/// Holds the pending flag for one start attempt and clears it on drop
struct PendingGuard<'a> {
    state: &'a AppState,
    announced: bool,
}

impl PendingGuard<'_> {
    /// Tell every screen a generated word is on its way
    fn announce(&mut self) {
        self.announced = true;
        self.state
            .broadcast_to_all(ServerMessage::WordPending { pending: true });
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.word_pending.store(false, Ordering::SeqCst);
        if self.announced {
            self.state
                .broadcast_to_all(ServerMessage::WordPending { pending: false });
        }
    }
}

impl AppState {
    fn emit(&self, event: FeedbackEvent) {
        emit(self.feedback.as_ref(), &event);
    }

    fn is_word_pending(&self) -> bool {
        self.word_pending.load(Ordering::SeqCst)
    }

    /// Resolve the secret word and deal the cards.
    ///
    /// The pending flag is held for the whole attempt, so resets, gate changes
    /// and other starts are turned away until the cards are dealt or the word
    /// source fails. The session lock is not held while a generated word is in
    /// flight.
    pub async fn start_game(
        &self,
        config: GameConfig,
        request: WordRequest,
    ) -> Result<(), StartError> {
        if self
            .word_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StartError::Busy);
        }
        let mut pending = PendingGuard {
            state: self,
            announced: false,
        };

        let gate = *self.mature_gate.read().await;

        let local = {
            let mut session = self.session.write().await;
            session.require_phase(Phase::Start, "start a game")?;
            session.validate_config(&config)?;
            self.words.resolve_local(&request, gate, &mut session.rng)
        };

        let word = match local {
            Some(result) => result?,
            None => {
                pending.announce();
                tracing::info!("Generating a secret word");
                self.words.resolve(&request, gate).await?
            }
        };

        self.session
            .write()
            .await
            .configure_and_start(&config, &word)?;
        drop(pending);

        self.emit(FeedbackEvent::GameStarted);
        Ok(())
    }

    /// Card for the current viewer
    pub async fn reveal_role(&self) -> Result<RoleCard, GameError> {
        let card = self.session.read().await.role_card()?;
        tracing::info!("Player {} looked at their card", card.viewer_index);
        self.emit(FeedbackEvent::RoleRevealed);
        Ok(card)
    }

    pub async fn advance(&self) -> Result<AdvanceOutcome, GameError> {
        let mut session = self.session.write().await;
        let outcome = session.advance_after_view()?;
        self.emit(FeedbackEvent::Click);

        if let AdvanceOutcome::RoundStarted { starting_player } = outcome {
            let name = session
                .player_name(starting_player)
                .map(str::to_string)
                .unwrap_or_else(|| super::default_name(starting_player));
            self.emit(FeedbackEvent::starting_player(&name));
        }
        Ok(outcome)
    }

    pub async fn proceed_to_voting(&self) -> Result<(), GameError> {
        self.session.write().await.proceed_to_voting()?;
        self.emit(FeedbackEvent::Click);
        Ok(())
    }

    pub async fn cast_vote(&self, index: PlayerIndex) -> Result<VoteResult, GameError> {
        let result = self.session.write().await.cast_vote(index)?;
        self.emit(FeedbackEvent::VoteCast);
        self.emit(if result.was_impostor {
            FeedbackEvent::CorrectAccusation
        } else {
            FeedbackEvent::WrongAccusation
        });
        Ok(result)
    }

    pub async fn continue_voting(&self) -> Result<(), GameError> {
        self.session.write().await.continue_voting()?;
        self.emit(FeedbackEvent::Click);
        Ok(())
    }

    /// Abandon the round and lock the adults-only category again.
    /// Refused while a start attempt holds the pending flag.
    pub async fn reset_game(&self) -> Result<(), GameError> {
        let mut session = self.session.write().await;
        if self.is_word_pending() {
            return Err(GameError::Busy);
        }
        session.reset_to_start();
        drop(session);

        let mut gate = self.mature_gate.write().await;
        if *gate != MatureGate::Locked {
            let state = gate.cancel();
            self.broadcast_to_all(ServerMessage::MatureGate { state });
        }
        drop(gate);

        tracing::info!("Game reset");
        self.emit(FeedbackEvent::Click);
        Ok(())
    }

    async fn update_mature_gate(
        &self,
        action: &'static str,
        step: fn(&mut MatureGate) -> MatureGate,
    ) -> Result<MatureGate, GameError> {
        let session = self.session.read().await;
        session.require_phase(Phase::Start, action)?;
        if self.is_word_pending() {
            return Err(GameError::Busy);
        }

        let state = step(&mut *self.mature_gate.write().await);
        drop(session);

        tracing::info!("Adults-only category: {:?}", state);
        self.broadcast_to_all(ServerMessage::MatureGate { state });
        Ok(state)
    }

    pub async fn request_mature_category(&self) -> Result<MatureGate, GameError> {
        self.update_mature_gate("unlock the adults-only category", MatureGate::request)
            .await
    }

    pub async fn confirm_mature_category(&self) -> Result<MatureGate, GameError> {
        self.update_mature_gate("unlock the adults-only category", MatureGate::confirm)
            .await
    }

    pub async fn cancel_mature_category(&self) -> Result<MatureGate, GameError> {
        self.update_mature_gate("lock the adults-only category", MatureGate::cancel)
            .await
    }

    /// Intents worth offering right now. None while a secret word is pending.
    fn valid_intents(&self, session: &Session) -> Vec<Intent> {
        if self.is_word_pending() {
            return Vec::new();
        }
        session.valid_intents()
    }

    /// Snapshot of the current phase for the presentation layer
    pub async fn view_message(&self) -> ServerMessage {
        let session = self.session.read().await;
        ServerMessage::View {
            game_id: session.game_id().cloned(),
            view: session.view(),
            valid_intents: self.valid_intents(&session),
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// First message on a new connection
    pub async fn welcome_message(&self) -> ServerMessage {
        let mature_gate = *self.mature_gate.read().await;
        let session = self.session.read().await;
        ServerMessage::Welcome {
            protocol: PROTOCOL_VERSION.to_string(),
            view: session.view(),
            valid_intents: self.valid_intents(&session),
            mature_gate,
            server_now: chrono::Utc::now().to_rfc3339(),
        }
    }
}
