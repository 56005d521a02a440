use super::{GameError, Session};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// What the current viewer sees on their card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleCard {
    pub viewer_index: PlayerIndex,
    pub viewer_name: String,
    pub is_impostor: bool,
    /// Only present for players who know the word
    pub secret_word: Option<String>,
}

/// One entry on the voting screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub index: PlayerIndex,
    pub name: String,
    pub already_accused: bool,
}

/// Shown once the round is over
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reveal {
    pub impostor_names: Vec<String>,
    pub secret_word: String,
}

/// Everything the presentation layer needs to render the current phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseView {
    Start {
        saved_config: Option<SavedConfig>,
        limits: GameLimits,
    },
    ViewingRole {
        player_count: usize,
        #[serde(flatten)]
        card: RoleCard,
    },
    RoundIntro {
        starting_player_index: PlayerIndex,
        starting_player_name: String,
    },
    Voting {
        candidates: Vec<Candidate>,
        attempts_remaining: usize,
    },
    Result {
        accused_index: PlayerIndex,
        accused_name: String,
        was_impostor: bool,
        outcome: VoteOutcome,
        attempts_remaining: usize,
        impostors_found: usize,
        impostors_total: usize,
        impostors_remaining: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        reveal: Option<Reveal>,
    },
}

impl Session {
    /// Card for the player currently holding the device
    pub fn role_card(&self) -> Result<RoleCard, GameError> {
        self.require_phase(Phase::ViewingRole, "reveal a role")?;

        let viewer_index = self.current_viewer;
        let is_impostor = self.is_impostor(viewer_index);
        Ok(RoleCard {
            viewer_index,
            viewer_name: self.name_or_default(viewer_index),
            is_impostor,
            secret_word: if is_impostor {
                None
            } else {
                self.secret_word.clone()
            },
        })
    }

    /// Voting screen entries; previously accused players are disabled
    pub fn candidates(&self) -> Vec<Candidate> {
        self.player_names
            .iter()
            .enumerate()
            .map(|(index, name)| Candidate {
                index,
                name: name.clone(),
                already_accused: self.vote_history.contains(&index),
            })
            .collect()
    }

    /// Impostor names and the word, available only once the round is over
    pub fn reveal(&self) -> Option<Reveal> {
        if self.phase != Phase::Result || !self.is_round_over() {
            return None;
        }
        Some(Reveal {
            impostor_names: self
                .impostors
                .iter()
                .map(|&i| self.name_or_default(i))
                .collect(),
            secret_word: self.secret_word.clone().unwrap_or_default(),
        })
    }

    fn name_or_default(&self, index: PlayerIndex) -> String {
        self.player_name(index)
            .map(str::to_string)
            .unwrap_or_else(|| super::roles::default_name(index))
    }

    fn start_view(&self) -> PhaseView {
        PhaseView::Start {
            saved_config: self.saved_config.clone(),
            limits: self.limits,
        }
    }

    /// Derive the view for the current phase
    pub fn view(&self) -> PhaseView {
        match self.phase {
            Phase::Start => self.start_view(),
            Phase::ViewingRole => match self.role_card() {
                Ok(card) => PhaseView::ViewingRole {
                    player_count: self.player_count(),
                    card,
                },
                Err(_) => self.start_view(),
            },
            Phase::RoundIntro => {
                let starting = self.starting_player.unwrap_or_default();
                PhaseView::RoundIntro {
                    starting_player_index: starting,
                    starting_player_name: self.name_or_default(starting),
                }
            }
            Phase::Voting => PhaseView::Voting {
                candidates: self.candidates(),
                attempts_remaining: self.attempts_remaining,
            },
            Phase::Result => {
                let Some(accused) = self.voted else {
                    tracing::error!("Result phase without an accused player");
                    return self.start_view();
                };
                let was_impostor = self.is_impostor(accused);
                PhaseView::Result {
                    accused_index: accused,
                    accused_name: self.name_or_default(accused),
                    was_impostor,
                    outcome: self.outcome(was_impostor),
                    attempts_remaining: self.attempts_remaining,
                    impostors_found: self.found_impostors.len(),
                    impostors_total: self.impostors.len(),
                    impostors_remaining: self.impostors_remaining(),
                    reveal: self.reveal(),
                }
            }
        }
    }
}
