use crate::corpus::document::{Difficulty, Ingredient, Step};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub ingredient_text: Option<String>,
    pub prep_time_min: Option<i64>,
    pub difficulty: String,
    pub image_url: String,
    pub content_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub tags: Vec<String>,
    pub ingredient_text: String,
    pub prep_time_min: Option<i64>,
    pub difficulty: Difficulty,
    pub image_url: String,
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct IngredientRow {
    pub recipe_id: i64,
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StepRow {
    pub recipe_id: i64,
    pub text: Option<String>,
    pub duration_sec: Option<i64>,
    pub ingredients_used: Option<String>,
    pub note: Option<String>,
}

/// Card projection of a recipe, never carrying steps or ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCard {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub prep_time_min: i64,
}

/// Raw row behind a `RecipeCard`; tags arrive unit-separator joined
#[derive(Debug, Clone, FromRow)]
pub struct RecipeCardRow {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub difficulty: String,
    pub prep_time_min: Option<i64>,
    pub tag_list: Option<String>,
}

/// Separator used by `group_concat` when flattening tag names
pub const TAG_SEPARATOR: char = '\u{1f}';

impl From<RecipeCardRow> for RecipeCard {
    fn from(row: RecipeCardRow) -> Self {
        let mut tags: Vec<String> = row
            .tag_list
            .as_deref()
            .unwrap_or_default()
            .split(TAG_SEPARATOR)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        tags.sort();

        RecipeCard {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
            difficulty: Difficulty::parse_lenient(Some(&row.difficulty)),
            tags,
            prep_time_min: row.prep_time_min.unwrap_or(0),
        }
    }
}

/// A retrieval candidate: the card plus ingredient lines for safety checks
#[derive(Debug, Clone)]
pub struct Candidate {
    pub card: RecipeCard,
    pub ingredients: Vec<Ingredient>,
}

/// One document of the ranking corpus
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CorpusEntry {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub ingredient_text: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            name: row.name.unwrap_or_default(),
            quantity: row.quantity,
            note: row.note,
        }
    }
}

impl From<StepRow> for Step {
    fn from(row: StepRow) -> Self {
        // Unreadable JSON is treated like a missing list
        let ingredients_used = row
            .ingredients_used
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        Step {
            text: row.text.unwrap_or_default(),
            duration_sec: row.duration_sec,
            ingredients_used,
            note: row.note,
        }
    }
}
