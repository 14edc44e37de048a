use crate::corpus::document::{Ingredient, Step};
use crate::db::{models::*, DbPool};
use crate::error::Result;
use sqlx::SqliteConnection;
use std::collections::HashMap;

/// Store ingredient lines for a recipe, keeping their order
pub async fn add_recipe_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[Ingredient],
) -> Result<()> {
    for (position, ing) in ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, name, quantity, note)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(recipe_id)
        .bind(position as i64)
        .bind(&ing.name)
        .bind(&ing.quantity)
        .bind(&ing.note)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Store steps for a recipe, keeping their order
pub async fn add_recipe_steps(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    steps: &[Step],
) -> Result<()> {
    for (position, step) in steps.iter().enumerate() {
        let ingredients_used = serde_json::to_string(&step.ingredients_used)?;

        sqlx::query(
            r#"
            INSERT INTO recipe_steps (recipe_id, position, text, duration_sec, ingredients_used, note)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(recipe_id)
        .bind(position as i64)
        .bind(&step.text)
        .bind(step.duration_sec)
        .bind(ingredients_used)
        .bind(&step.note)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Get ingredients for multiple recipes in a single query
pub async fn get_ingredients_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<Ingredient>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query_str = format!(
        r#"
        SELECT recipe_id, name, quantity, note
        FROM recipe_ingredients
        WHERE recipe_id IN ({})
        ORDER BY recipe_id, position
        "#,
        placeholders(recipe_ids.len())
    );

    let mut query = sqlx::query_as::<_, IngredientRow>(&query_str);
    for id in recipe_ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<Ingredient>> =
        recipe_ids.iter().map(|&id| (id, Vec::new())).collect();
    for row in rows {
        map.entry(row.recipe_id).or_default().push(row.into());
    }

    Ok(map)
}

/// Get steps for multiple recipes in a single query
pub async fn get_steps_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<Step>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query_str = format!(
        r#"
        SELECT recipe_id, text, duration_sec, ingredients_used, note
        FROM recipe_steps
        WHERE recipe_id IN ({})
        ORDER BY recipe_id, position
        "#,
        placeholders(recipe_ids.len())
    );

    let mut query = sqlx::query_as::<_, StepRow>(&query_str);
    for id in recipe_ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<Step>> =
        recipe_ids.iter().map(|&id| (id, Vec::new())).collect();
    for row in rows {
        map.entry(row.recipe_id).or_default().push(row.into());
    }

    Ok(map)
}
