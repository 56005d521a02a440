use serde::{Deserialize, Serialize};

/// Opaque ID types
pub type GameId = String;
/// Stable player identifier for a whole round (position in the name list)
pub type PlayerIndex = usize;

/// Absolute floor for a game: the word side must never be alone
pub const ABSOLUTE_MIN_PLAYERS: usize = 2;
pub const DEFAULT_MIN_PLAYERS: usize = 3;
pub const DEFAULT_MAX_PLAYERS: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Start,
    ViewingRole,
    RoundIntro,
    Voting,
    Result,
}

/// Intents the presentation layer can send to the session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StartGame,
    RevealRole,
    Advance,
    ProceedToVoting,
    CastVote,
    ContinueVoting,
    ResetGame,
}

/// Player count bounds enforced at configuration time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameLimits {
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for GameLimits {
    fn default() -> Self {
        Self {
            min_players: DEFAULT_MIN_PLAYERS,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

impl GameLimits {
    /// Build limits, clamping nonsense values back to something playable
    pub fn new(min_players: usize, max_players: usize) -> Self {
        let min_players = min_players.max(ABSOLUTE_MIN_PLAYERS);
        Self {
            min_players,
            max_players: max_players.max(min_players),
        }
    }

    /// Highest impostor count allowed for a given table size.
    /// At least two players must know the word, but one impostor is always allowed.
    pub fn max_impostors(player_count: usize) -> usize {
        player_count.saturating_sub(2).max(1)
    }
}

/// Configuration collected on the pre-game screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub player_count: usize,
    pub impostor_count: usize,
    /// Names as typed. Empty means "use defaults for everyone".
    #[serde(default)]
    pub names: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_MIN_PLAYERS,
            impostor_count: 1,
            names: Vec::new(),
        }
    }
}

/// Last configuration used, kept across resets to prefill the next game
pub type SavedConfig = GameConfig;

/// Result of a single accusation, as shown on the result screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Accused was an impostor, more remain
    Caught,
    /// Accused was innocent, attempts remain
    Missed,
    /// Every impostor has been found
    FullVictory,
    /// Attempts exhausted before every impostor was found
    Defeat,
}

impl VoteOutcome {
    pub fn is_round_over(&self) -> bool {
        matches!(self, VoteOutcome::FullVictory | VoteOutcome::Defeat)
    }
}
