use super::roles;
use super::GameError;
use crate::types::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// The game state machine for one pass-the-device session.
///
/// Owned by a single controller and mutated in place. Every transition
/// validates its preconditions and leaves the session untouched on error.
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) phase: Phase,
    pub(super) game_id: Option<GameId>,
    pub(super) limits: GameLimits,
    pub(super) player_names: Vec<String>,
    pub(super) secret_word: Option<String>,
    pub(super) impostors: BTreeSet<PlayerIndex>,
    pub(super) found_impostors: BTreeSet<PlayerIndex>,
    pub(super) current_viewer: PlayerIndex,
    pub(super) starting_player: Option<PlayerIndex>,
    pub(super) voted: Option<PlayerIndex>,
    pub(super) vote_history: Vec<PlayerIndex>,
    pub(super) attempts_remaining: usize,
    pub(super) saved_config: Option<SavedConfig>,
    pub(super) rng: StdRng,
}

/// What happened when the current viewer handed the device on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Next player's turn to look at their card
    NextViewer(PlayerIndex),
    /// Everyone has seen their card; the debate starts with this player
    RoundStarted { starting_player: PlayerIndex },
}

impl Session {
    /// Create a session seeded from the operating system
    pub fn new(limits: GameLimits) -> Self {
        Self::with_rng(limits, StdRng::from_os_rng())
    }

    /// Create a session with a fixed seed so shuffles are reproducible
    pub fn with_seed(limits: GameLimits, seed: u64) -> Self {
        Self::with_rng(limits, StdRng::seed_from_u64(seed))
    }

    fn with_rng(limits: GameLimits, rng: StdRng) -> Self {
        Self {
            phase: Phase::Start,
            game_id: None,
            limits,
            player_names: Vec::new(),
            secret_word: None,
            impostors: BTreeSet::new(),
            found_impostors: BTreeSet::new(),
            current_viewer: 0,
            starting_player: None,
            voted: None,
            vote_history: Vec::new(),
            attempts_remaining: 0,
            saved_config: None,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn limits(&self) -> GameLimits {
        self.limits
    }

    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    pub fn player_name(&self, index: PlayerIndex) -> Option<&str> {
        self.player_names.get(index).map(String::as_str)
    }

    pub fn secret_word(&self) -> Option<&str> {
        self.secret_word.as_deref()
    }

    pub fn impostors(&self) -> &BTreeSet<PlayerIndex> {
        &self.impostors
    }

    pub fn found_impostors(&self) -> &BTreeSet<PlayerIndex> {
        &self.found_impostors
    }

    pub fn is_impostor(&self, index: PlayerIndex) -> bool {
        self.impostors.contains(&index)
    }

    pub fn current_viewer(&self) -> PlayerIndex {
        self.current_viewer
    }

    pub fn starting_player(&self) -> Option<PlayerIndex> {
        self.starting_player
    }

    pub fn voted(&self) -> Option<PlayerIndex> {
        self.voted
    }

    pub fn vote_history(&self) -> &[PlayerIndex] {
        &self.vote_history
    }

    pub fn attempts_remaining(&self) -> usize {
        self.attempts_remaining
    }

    pub fn saved_config(&self) -> Option<&SavedConfig> {
        self.saved_config.as_ref()
    }

    /// Check if a phase transition is allowed by the state machine
    pub(super) fn is_valid_transition(from: Phase, to: Phase) -> bool {
        use Phase::*;

        match (from, to) {
            (Start, ViewingRole) => true,
            // Next player's card, or everyone has seen theirs
            (ViewingRole, ViewingRole) => true,
            (ViewingRole, RoundIntro) => true,
            (RoundIntro, Voting) => true,
            (Voting, Result) => true,
            (Result, Voting) => true,

            // New game from anywhere
            (_, Start) => true,

            _ => false,
        }
    }

    /// Apply a transition, rejecting anything the state machine does not allow
    pub(super) fn transition(&mut self, to: Phase, action: &'static str) -> Result<(), GameError> {
        if !Self::is_valid_transition(self.phase, to) {
            return Err(GameError::InvalidAction {
                action,
                phase: self.phase,
            });
        }
        tracing::debug!("Phase {:?} -> {:?} ({})", self.phase, to, action);
        self.phase = to;
        Ok(())
    }

    pub(super) fn require_phase(&self, expected: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::InvalidAction {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Intents the presentation layer may offer right now
    pub fn valid_intents(&self) -> Vec<Intent> {
        match self.phase {
            Phase::Start => vec![Intent::StartGame, Intent::ResetGame],
            Phase::ViewingRole => vec![Intent::RevealRole, Intent::Advance, Intent::ResetGame],
            Phase::RoundIntro => vec![Intent::ProceedToVoting, Intent::ResetGame],
            Phase::Voting => vec![Intent::CastVote, Intent::ResetGame],
            Phase::Result if self.is_round_over() => vec![Intent::ResetGame],
            Phase::Result => vec![Intent::ContinueVoting, Intent::ResetGame],
        }
    }

    /// Validate a configuration against the session limits
    pub fn validate_config(&self, config: &GameConfig) -> Result<(), GameError> {
        validate_config(&self.limits, config)
    }

    /// Configure a new round and hand the device to the first player
    pub fn configure_and_start(
        &mut self,
        config: &GameConfig,
        secret_word: &str,
    ) -> Result<(), GameError> {
        self.require_phase(Phase::Start, "start a game")?;
        self.validate_config(config)?;

        let secret_word = secret_word.trim();
        if secret_word.is_empty() {
            return Err(GameError::ConfigInvalid(
                "Secret word must not be empty".to_string(),
            ));
        }

        let player_count = config.player_count;
        let impostor_count = config.impostor_count;

        self.transition(Phase::ViewingRole, "start a game")?;

        self.player_names = roles::resolve_names(player_count, &config.names);
        self.secret_word = Some(secret_word.to_string());
        self.vote_history.clear();
        self.found_impostors.clear();
        self.voted = None;
        self.starting_player = None;
        self.attempts_remaining = impostor_count;
        self.impostors = roles::assign_impostors(player_count, impostor_count, &mut self.rng);
        self.current_viewer = 0;
        self.saved_config = Some(config.clone());
        self.game_id = Some(ulid::Ulid::new().to_string());

        tracing::info!(
            "Game {} started: {} players, {} impostor(s)",
            self.game_id.as_deref().unwrap_or_default(),
            player_count,
            impostor_count
        );

        Ok(())
    }

    /// The current viewer is done looking at their card
    pub fn advance_after_view(&mut self) -> Result<AdvanceOutcome, GameError> {
        self.require_phase(Phase::ViewingRole, "advance to the next player")?;

        let next = self.current_viewer + 1;
        if next < self.player_count() {
            self.current_viewer = next;
            return Ok(AdvanceOutcome::NextViewer(next));
        }

        self.transition(Phase::RoundIntro, "advance to the next player")?;
        let starting_player = roles::pick_starting_player(self.player_count(), &mut self.rng);
        self.starting_player = Some(starting_player);

        tracing::info!("All roles viewed, player {} starts", starting_player);

        Ok(AdvanceOutcome::RoundStarted { starting_player })
    }

    /// Leave the round intro and open the vote
    pub fn proceed_to_voting(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::RoundIntro, "proceed to voting")?;
        self.transition(Phase::Voting, "proceed to voting")
    }

    /// Drop every round field and go back to configuration.
    /// The last configuration survives to prefill the next game.
    pub fn reset_to_start(&mut self) {
        self.phase = Phase::Start;
        self.game_id = None;
        self.player_names.clear();
        self.secret_word = None;
        self.impostors.clear();
        self.found_impostors.clear();
        self.current_viewer = 0;
        self.starting_player = None;
        self.voted = None;
        self.vote_history.clear();
        self.attempts_remaining = 0;
    }
}

/// Check player and impostor counts against the limits
pub fn validate_config(limits: &GameLimits, config: &GameConfig) -> Result<(), GameError> {
    if config.player_count < limits.min_players || config.player_count > limits.max_players {
        return Err(GameError::ConfigInvalid(format!(
            "Player count must be between {} and {}",
            limits.min_players, limits.max_players
        )));
    }

    let max_impostors = GameLimits::max_impostors(config.player_count);
    if config.impostor_count < 1 || config.impostor_count > max_impostors {
        return Err(GameError::ConfigInvalid(format!(
            "Impostor count must be between 1 and {} for {} players",
            max_impostors, config.player_count
        )));
    }

    Ok(())
}
