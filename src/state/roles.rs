//! Role assignment: who is an impostor, who starts the debate, what everyone is called.

use crate::types::PlayerIndex;
use rand::Rng;
use std::collections::BTreeSet;

/// Name shown for a player who did not type one
pub fn default_name(index: PlayerIndex) -> String {
    format!("Player {}", index + 1)
}

/// Resolve the final name list for a table of `player_count`.
/// Missing or blank entries get the default name; extra entries are dropped.
pub fn resolve_names(player_count: usize, names: &[String]) -> Vec<String> {
    (0..player_count)
        .map(|i| {
            names
                .get(i)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_name(i))
        })
        .collect()
}

/// Uniform random permutation of `0..count` (Fisher-Yates, back to front)
pub fn shuffled_indices<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<PlayerIndex> {
    let mut indices: Vec<PlayerIndex> = (0..count).collect();
    for i in (1..count).rev() {
        let j = rng.random_range(0..=i);
        indices.swap(i, j);
    }
    indices
}

/// Pick `impostor_count` distinct impostors uniformly at random
pub fn assign_impostors<R: Rng + ?Sized>(
    player_count: usize,
    impostor_count: usize,
    rng: &mut R,
) -> BTreeSet<PlayerIndex> {
    shuffled_indices(player_count, rng)
        .into_iter()
        .take(impostor_count)
        .collect()
}

/// Pick who opens the debate. Independent of the impostor draw.
pub fn pick_starting_player<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> PlayerIndex {
    rng.random_range(0..player_count)
}
