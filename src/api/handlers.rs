use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::models::*,
    assistant, db,
    dietary::DietaryLexicon,
    ranking::{self, RankedRecipe},
    utils::sanitize::{clamp_limit, sanitize_pantry, truncate},
    Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub lexicon: Arc<DietaryLexicon>,
    pub settings: crate::config::Settings,
}

/// POST /api/assistant - Suggest safe recipes for a free-text request
pub async fn assistant(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>> {
    debug!("Assistant request: {}", truncate(&request.message, 120));

    let reply = assistant::suggest(
        &state.pool,
        &state.lexicon,
        &state.settings.assistant,
        &request.message,
    )
    .await?;

    Ok(Json(AssistantResponse {
        intent: reply.intent,
        reply: reply.reply,
        tier: reply.tier,
        suggestions: reply.suggestions,
    }))
}

/// POST /api/search/by-ingredients - Rank recipes against a pantry list
pub async fn search_by_ingredients(
    State(state): State<AppState>,
    Json(request): Json<IngredientSearchRequest>,
) -> Result<Json<Vec<RankedRecipe>>> {
    let ranking = &state.settings.ranking;
    let pantry = sanitize_pantry(&request.pantry, ranking.max_pantry_items);
    let limit = clamp_limit(request.limit, ranking.default_limit, ranking.max_limit);
    debug!("Pantry search: {:?} (limit {})", pantry, limit);

    let results = ranking::top_matches(&state.pool, &pantry, limit).await?;

    Ok(Json(results))
}

/// GET /api/tags - Distinct tags in use
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let tags = db::tags::list_tags(&state.pool).await?;
    Ok(Json(tags))
}

/// GET /api/tags/counts - Tags with their recipe counts
pub async fn tag_counts(State(state): State<AppState>) -> Result<Json<Vec<TagCount>>> {
    let counts = db::tags::get_tags_with_count(&state.pool)
        .await?
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();

    Ok(Json(counts))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    // Check database connectivity
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
        lexicon_categories: state.lexicon.categories().len(),
    }))
}
