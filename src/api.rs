//! HTTP API endpoints the pre-game screen reads before opening the socket.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::GameLimits;
use crate::words::Category;

/// One selectable word category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub label: &'static str,
    /// Needs the two-step adults-only confirmation
    pub mature: bool,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitsResponse {
    pub min_players: usize,
    pub max_players: usize,
    /// Largest impostor count allowed for each player count, in order
    pub max_impostors: Vec<ImpostorLimit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpostorLimit {
    pub player_count: usize,
    pub max_impostors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WordGenerationResponse {
    pub available: bool,
    pub providers: Vec<String>,
}

/// List word categories.
///
/// GET /api/categories
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(
        Category::ALL
            .iter()
            .map(|category| CategoryInfo {
                id: *category,
                label: category.label(),
                mature: category.is_mature(),
                word_count: category.words().len(),
            })
            .collect(),
    )
}

/// Player and impostor limits for the configuration form.
///
/// GET /api/limits
pub async fn get_limits(State(state): State<Arc<AppState>>) -> Json<LimitsResponse> {
    let limits = state.session.read().await.limits();
    Json(limits_response(limits))
}

fn limits_response(limits: GameLimits) -> LimitsResponse {
    LimitsResponse {
        min_players: limits.min_players,
        max_players: limits.max_players,
        max_impostors: (limits.min_players..=limits.max_players)
            .map(|player_count| ImpostorLimit {
                player_count,
                max_impostors: GameLimits::max_impostors(player_count),
            })
            .collect(),
    }
}

/// Whether topic-based word generation can be offered.
///
/// GET /api/word-generation
pub async fn word_generation(State(state): State<Arc<AppState>>) -> Json<WordGenerationResponse> {
    let providers = state.words.generation_providers();
    Json(WordGenerationResponse {
        available: !providers.is_empty(),
        providers,
    })
}
