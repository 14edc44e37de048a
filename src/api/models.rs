use crate::assistant::{intent::Intent, Tier};
use crate::db::models::RecipeCard;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Free-text assistant request
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub message: String,
}

/// Assistant response: understood intent, reply text and safe recipe cards
#[derive(Debug, Clone, Serialize)]
pub struct AssistantResponse {
    pub intent: Intent,
    pub reply: String,
    pub tier: Tier,
    pub suggestions: Vec<RecipeCard>,
}

/// Pantry search request; items may arrive as any JSON scalars
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientSearchRequest {
    #[serde(default, deserialize_with = "pantry_items")]
    pub pantry: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
}

fn pantry_items<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Numbers, numeric strings and floats are accepted; anything else means "unset"
fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let limit = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    Ok(limit)
}

/// Tag with the number of recipes carrying it
#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
    pub lexicon_categories: usize,
}
