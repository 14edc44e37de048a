use crate::db::DbPool;
use crate::error::Result;
use regex::Regex;
use sqlx::SqliteConnection;
use std::collections::HashMap;

/// Normalize tag name (lowercase, trim)
pub fn normalize_tag(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Get or create a tag by name, returning its id
pub async fn get_or_create_tag(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    let normalized = normalize_tag(name);

    sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
        .bind(&normalized)
        .execute(&mut *conn)
        .await?;

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM tags WHERE name = ?")
        .bind(&normalized)
        .fetch_one(&mut *conn)
        .await?;

    Ok(id)
}

/// Merge tags into a recipe's tag set on an open connection.
/// Returns how many links were actually added.
pub async fn add_recipe_tags_with(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tag_names: &[String],
) -> Result<u64> {
    let mut added = 0;

    for tag_name in tag_names {
        if normalize_tag(tag_name).is_empty() {
            continue;
        }
        let tag_id = get_or_create_tag(conn, tag_name).await?;
        let result = sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
        added += result.rows_affected();
    }

    Ok(added)
}

/// Additive, idempotent set-union of tags into a recipe
pub async fn add_recipe_tags(pool: &DbPool, recipe_id: i64, tag_names: &[String]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let added = add_recipe_tags_with(&mut tx, recipe_id, tag_names).await?;
    tx.commit().await?;
    Ok(added)
}

/// Get tags for multiple recipes in a single query (batch loading to avoid N+1)
pub async fn get_tags_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = recipe_ids
        .iter()
        .enumerate()
        .map(|(i, _)| format!("?{}", i + 1))
        .collect::<Vec<_>>()
        .join(",");

    let query_str = format!(
        r#"
        SELECT rt.recipe_id, t.name
        FROM recipe_tags rt
        JOIN tags t ON rt.tag_id = t.id
        WHERE rt.recipe_id IN ({placeholders})
        ORDER BY rt.recipe_id, t.name
        "#
    );

    let mut query = sqlx::query_as::<_, (i64, String)>(&query_str);
    for id in recipe_ids {
        query = query.bind(id);
    }

    let results: Vec<(i64, String)> = query.fetch_all(pool).await?;

    let mut tags_map: HashMap<i64, Vec<String>> = HashMap::new();
    for (recipe_id, tag_name) in results {
        tags_map.entry(recipe_id).or_default().push(tag_name);
    }

    // Ensure all recipe_ids have an entry (even if empty)
    for &recipe_id in recipe_ids {
        tags_map.entry(recipe_id).or_default();
    }

    Ok(tags_map)
}

/// Distinct tags carried by at least one recipe, sorted
pub async fn list_tags(pool: &DbPool) -> Result<Vec<String>> {
    let tags = sqlx::query_scalar(
        r#"
        SELECT DISTINCT t.name
        FROM tags t
        JOIN recipe_tags rt ON rt.tag_id = t.id
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// Tags in use with their recipe counts, sorted by tag
pub async fn get_tags_with_count(pool: &DbPool) -> Result<Vec<(String, i64)>> {
    let tags: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT t.name, COUNT(rt.recipe_id) as count
        FROM tags t
        JOIN recipe_tags rt ON rt.tag_id = t.id
        GROUP BY t.id, t.name
        ORDER BY t.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// Count recipe/tag links
pub async fn count_recipe_tags(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipe_tags")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Recipes (id, title) carrying any tag matching `pattern`, newest first
pub async fn recipes_with_tag_matching(
    pool: &DbPool,
    pattern: &Regex,
    limit: usize,
) -> Result<Vec<(i64, String)>> {
    let tag_ids: Vec<i64> = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM tags")
        .fetch_all(pool)
        .await?
        .into_iter()
        .filter(|(_, name)| pattern.is_match(name))
        .map(|(id, _)| id)
        .collect();

    if tag_ids.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; tag_ids.len()].join(",");
    let query_str = format!(
        r#"
        SELECT DISTINCT r.id, r.title
        FROM recipes r
        JOIN recipe_tags rt ON rt.recipe_id = r.id
        WHERE rt.tag_id IN ({placeholders})
        ORDER BY r.id DESC
        LIMIT ?
        "#
    );

    let mut query = sqlx::query_as::<_, (i64, String)>(&query_str);
    for id in &tag_ids {
        query = query.bind(id);
    }
    let recipes = query.bind(limit as i64).fetch_all(pool).await?;

    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, recipes, recipes::tests::new_recipe};

    #[tokio::test]
    async fn test_tags_are_additive_and_idempotent() {
        let pool = memory_pool().await.unwrap();
        let id = recipes::insert_recipe(&pool, &new_recipe("Test Recipe", &["flour"], &["Dessert"]))
            .await
            .unwrap();

        let added = add_recipe_tags(&pool, id, &["dessert".to_string(), "Cookies".to_string()])
            .await
            .unwrap();
        assert_eq!(added, 1);

        let added = add_recipe_tags(&pool, id, &["cookies".to_string()])
            .await
            .unwrap();
        assert_eq!(added, 0);

        // Tags should be normalized
        let tags = get_tags_for_recipes(&pool, &[id]).await.unwrap();
        assert_eq!(tags[&id], ["cookies", "dessert"]);
    }

    #[tokio::test]
    async fn test_batch_tags_and_counts() {
        let pool = memory_pool().await.unwrap();
        let a = recipes::insert_recipe(&pool, &new_recipe("A", &[], &["vegan", "quick"]))
            .await
            .unwrap();
        let b = recipes::insert_recipe(&pool, &new_recipe("B", &[], &["vegan"]))
            .await
            .unwrap();
        let c = recipes::insert_recipe(&pool, &new_recipe("C", &[], &[]))
            .await
            .unwrap();

        let map = get_tags_for_recipes(&pool, &[a, b, c]).await.unwrap();
        assert_eq!(map[&a], ["quick", "vegan"]);
        assert_eq!(map[&b], ["vegan"]);
        assert!(map[&c].is_empty());

        assert_eq!(list_tags(&pool).await.unwrap(), ["quick", "vegan"]);
        assert_eq!(
            get_tags_with_count(&pool).await.unwrap(),
            [("quick".to_string(), 1), ("vegan".to_string(), 2)]
        );
        assert_eq!(count_recipe_tags(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_recipes_with_tag_matching() {
        let pool = memory_pool().await.unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Rice Bowl", &[], &["gluten free"]))
            .await
            .unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Polenta", &[], &["gluten-free"]))
            .await
            .unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Bagel", &[], &["breakfast"]))
            .await
            .unwrap();

        let pattern = Regex::new(r"(?i)^gluten[-\s]?free$").unwrap();
        let found = recipes_with_tag_matching(&pool, &pattern, 5).await.unwrap();
        let titles: Vec<_> = found.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(titles, ["Polenta", "Rice Bowl"]);
    }
}
