use crate::corpus::document::RecipeDocument;
use crate::db::{self, models::NewRecipe, DbPool};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of one import run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Recipes written to the store
    pub imported: usize,
    /// Recipes already present with the same content hash
    pub duplicates: usize,
    /// Entries that were not objects or had no title
    pub skipped: usize,
}

/// Import a JSON file holding an array of recipe documents
pub async fn import_file(pool: &DbPool, path: &Path) -> Result<ImportReport> {
    info!("Importing recipes from {}", path.display());
    let raw = tokio::fs::read_to_string(path).await?;
    import_json(pool, &raw).await
}

/// Import recipe documents from a JSON array
pub async fn import_json(pool: &DbPool, raw: &str) -> Result<ImportReport> {
    let entries = match serde_json::from_str::<Value>(raw)? {
        Value::Array(entries) => entries,
        _ => {
            return Err(Error::Validation(
                "Import file must contain a JSON array of recipes".to_string(),
            ))
        }
    };

    let mut report = ImportReport::default();

    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!("Skipping entry {}: not an object", index);
            report.skipped += 1;
            continue;
        }

        let doc: RecipeDocument = match serde_json::from_value(entry) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Skipping entry {}: {}", index, e);
                report.skipped += 1;
                continue;
            }
        };

        if doc.title.trim().is_empty() {
            warn!("Skipping entry {}: missing title", index);
            report.skipped += 1;
            continue;
        }

        let new_recipe = NewRecipe::from_document(&doc);
        if let Some(hash) = new_recipe.content_hash.as_deref() {
            if let Some(existing) = db::recipes::find_by_content_hash(pool, hash).await? {
                debug!("Recipe '{}' already stored as {}", new_recipe.title, existing);
                report.duplicates += 1;
                continue;
            }
        }

        let id = db::recipes::insert_recipe(pool, &new_recipe).await?;
        debug!("Imported recipe {} '{}'", id, new_recipe.title);
        report.imported += 1;
    }

    info!(
        "Import finished: {} imported, {} duplicates, {} skipped",
        report.imported, report.duplicates, report.skipped
    );

    Ok(report)
}
