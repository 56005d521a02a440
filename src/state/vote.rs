use super::{GameError, Session};
use crate::types::*;

/// Resolution of a single accusation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteResult {
    pub accused: PlayerIndex,
    pub was_impostor: bool,
    pub outcome: VoteOutcome,
    pub attempts_remaining: usize,
}

impl Session {
    /// Every impostor found, or no attempts left
    pub fn is_round_over(&self) -> bool {
        self.is_full_victory() || self.attempts_remaining == 0
    }

    /// Every impostor found. Takes precedence when the last attempt also finds the last impostor.
    pub fn is_full_victory(&self) -> bool {
        !self.impostors.is_empty() && self.found_impostors.len() >= self.impostors.len()
    }

    pub fn impostors_remaining(&self) -> usize {
        self.impostors.len().saturating_sub(self.found_impostors.len())
    }

    /// Whether `index` can still be accused this round
    pub fn can_accuse(&self, index: PlayerIndex) -> bool {
        index < self.player_count() && !self.vote_history.contains(&index)
    }

    /// Outcome of the most recent vote given the current counters
    pub(super) fn outcome(&self, was_impostor: bool) -> VoteOutcome {
        if self.is_full_victory() {
            VoteOutcome::FullVictory
        } else if self.attempts_remaining == 0 {
            VoteOutcome::Defeat
        } else if was_impostor {
            VoteOutcome::Caught
        } else {
            VoteOutcome::Missed
        }
    }

    /// Accuse a player. Costs one attempt whatever the result.
    pub fn cast_vote(&mut self, accused: PlayerIndex) -> Result<VoteResult, GameError> {
        self.require_phase(Phase::Voting, "cast a vote")?;

        if self.is_round_over() {
            return Err(GameError::RoundOver);
        }
        if accused >= self.player_count() {
            return Err(GameError::PlayerOutOfRange {
                index: accused,
                count: self.player_count(),
            });
        }
        if self.vote_history.contains(&accused) {
            return Err(GameError::AlreadyAccused(accused));
        }

        self.transition(Phase::Result, "cast a vote")?;

        self.voted = Some(accused);
        self.vote_history.push(accused);
        self.attempts_remaining -= 1;

        let was_impostor = self.impostors.contains(&accused);
        if was_impostor {
            self.found_impostors.insert(accused);
        }

        let outcome = self.outcome(was_impostor);
        tracing::info!(
            "Player {} accused: impostor={}, outcome={:?}, attempts left={}",
            accused,
            was_impostor,
            outcome,
            self.attempts_remaining
        );

        Ok(VoteResult {
            accused,
            was_impostor,
            outcome,
            attempts_remaining: self.attempts_remaining,
        })
    }

    /// Back to the vote after a result, as long as the round is still open
    pub fn continue_voting(&mut self) -> Result<(), GameError> {
        self.require_phase(Phase::Result, "continue voting")?;
        if self.is_round_over() {
            return Err(GameError::RoundOver);
        }
        self.transition(Phase::Voting, "continue voting")?;
        self.voted = None;
        Ok(())
    }
}
