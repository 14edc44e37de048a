use crate::corpus::document::{Difficulty, RecipeDocument};
use crate::db::{ingredients, models::*, tags, DbPool};
use crate::error::Result;
use chrono::Utc;
use futures::TryStreamExt;
use sha2::{Digest, Sha256};

/// Fingerprint of a recipe's identity, used to skip re-imports
pub fn calculate_content_hash(title: &str, ingredient_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.trim().as_bytes());
    hasher.update(b"\n");
    hasher.update(ingredient_text.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Find a recipe id by content hash
pub async fn find_by_content_hash(pool: &DbPool, content_hash: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar("SELECT id FROM recipes WHERE content_hash = ? LIMIT 1")
        .bind(content_hash)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Create a recipe together with its ingredients, steps and tags
pub async fn insert_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<i64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let (recipe_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO recipes (
            title, ingredient_text, prep_time_min, difficulty,
            image_url, content_hash, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&new_recipe.title)
    .bind(&new_recipe.ingredient_text)
    .bind(new_recipe.prep_time_min)
    .bind(new_recipe.difficulty.as_str())
    .bind(&new_recipe.image_url)
    .bind(&new_recipe.content_hash)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    ingredients::add_recipe_ingredients(&mut tx, recipe_id, &new_recipe.ingredients).await?;
    ingredients::add_recipe_steps(&mut tx, recipe_id, &new_recipe.steps).await?;
    tags::add_recipe_tags_with(&mut tx, recipe_id, &new_recipe.tags).await?;

    tx.commit().await?;

    Ok(recipe_id)
}

/// Count all recipes
pub async fn count_all_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Load full documents for the next page of recipes with id above `after_id`,
/// in ascending id order
pub async fn fetch_documents_after(
    pool: &DbPool,
    after_id: i64,
    limit: usize,
) -> Result<Vec<(i64, RecipeDocument)>> {
    let recipes = sqlx::query_as::<_, Recipe>(
        "SELECT * FROM recipes WHERE id > ? ORDER BY id ASC LIMIT ?",
    )
    .bind(after_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
    let mut tags_map = tags::get_tags_for_recipes(pool, &ids).await?;
    let mut ingredients_map = ingredients::get_ingredients_for_recipes(pool, &ids).await?;
    let mut steps_map = ingredients::get_steps_for_recipes(pool, &ids).await?;

    let documents = recipes
        .into_iter()
        .map(|recipe| {
            let doc = RecipeDocument {
                tags: tags_map.remove(&recipe.id).unwrap_or_default(),
                ingredients: ingredients_map.remove(&recipe.id).unwrap_or_default(),
                steps: steps_map.remove(&recipe.id).unwrap_or_default(),
                ingredient_text: recipe.ingredient_text,
                prep_time_min: recipe.prep_time_min,
                difficulty: Some(recipe.difficulty),
                image_url: Some(recipe.image_url),
                title: recipe.title,
            };
            (recipe.id, doc)
        })
        .collect();

    Ok(documents)
}

/// The ranking corpus: every recipe with its ingredient text, in ascending id order
pub async fn fetch_ranking_corpus(pool: &DbPool) -> Result<Vec<CorpusEntry>> {
    let corpus = sqlx::query_as::<_, CorpusEntry>(
        r#"
        SELECT id, title, image_url, COALESCE(ingredient_text, '') AS ingredient_text
        FROM recipes
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(corpus)
}

/// Walk recipes newest first and collect up to `limit` cards accepted by
/// `keep`, then attach their ingredient lines.
pub async fn fetch_candidates<F>(pool: &DbPool, limit: usize, keep: F) -> Result<Vec<Candidate>>
where
    F: Fn(&RecipeCard) -> bool,
{
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut cards = Vec::new();
    {
        let mut rows = sqlx::query_as::<_, RecipeCardRow>(
            r#"
            SELECT r.id, r.title, r.image_url, r.difficulty, r.prep_time_min,
                   (SELECT group_concat(t.name, char(31))
                    FROM recipe_tags rt
                    JOIN tags t ON t.id = rt.tag_id
                    WHERE rt.recipe_id = r.id) AS tag_list
            FROM recipes r
            ORDER BY r.id DESC
            "#,
        )
        .fetch(pool);

        while let Some(row) = rows.try_next().await? {
            let card = RecipeCard::from(row);
            if keep(&card) {
                cards.push(card);
                if cards.len() >= limit {
                    break;
                }
            }
        }
    }

    let ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
    let mut ingredients_map = ingredients::get_ingredients_for_recipes(pool, &ids).await?;

    let candidates = cards
        .into_iter()
        .map(|card| Candidate {
            ingredients: ingredients_map.remove(&card.id).unwrap_or_default(),
            card,
        })
        .collect();

    Ok(candidates)
}

impl NewRecipe {
    /// Build an insertable recipe from an imported document
    pub fn from_document(doc: &RecipeDocument) -> Self {
        let ingredient_text = doc
            .ingredient_text
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| crate::corpus::normalize::derived_ingredient_text(&doc.ingredients));

        NewRecipe {
            title: doc.title.trim().to_string(),
            ingredients: doc.ingredients.clone(),
            steps: doc.steps.clone(),
            tags: doc.tags.clone(),
            content_hash: Some(calculate_content_hash(&doc.title, &ingredient_text)),
            ingredient_text,
            prep_time_min: doc.prep_time_min,
            difficulty: Difficulty::parse_lenient(doc.difficulty.as_deref()),
            image_url: doc.image_url.clone().unwrap_or_default(),
        }
    }
}
