// Pantry-based recipe ranking

pub mod tfidf;

use crate::db::{self, models::CorpusEntry, DbPool};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tfidf::TfIdf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecipe {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    pub score: f64,
}

/// Score every corpus entry against the pantry and keep the best `top_n`.
/// Ties keep corpus order; an empty pantry scores everything 0.
pub fn rank(corpus: Vec<CorpusEntry>, pantry: &[String], top_n: usize) -> Vec<RankedRecipe> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let mut tfidf = TfIdf::new();
    for entry in &corpus {
        tfidf.add_document(&entry.ingredient_text);
    }

    let query = pantry
        .iter()
        .map(|item| item.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let scores = tfidf.scores(&query);

    let mut ranked: Vec<RankedRecipe> = corpus
        .into_iter()
        .zip(scores)
        .map(|(entry, score)| RankedRecipe {
            id: entry.id,
            title: entry.title,
            image_url: entry.image_url,
            score,
        })
        .collect();

    // Stable: equal scores stay in corpus order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}

/// Rank the stored corpus against a pantry list
pub async fn top_matches(pool: &DbPool, pantry: &[String], top_n: usize) -> Result<Vec<RankedRecipe>> {
    let corpus = db::recipes::fetch_ranking_corpus(pool).await?;
    debug!(
        "Ranking {} recipes against {} pantry items",
        corpus.len(),
        pantry.len()
    );
    Ok(rank(corpus, pantry, top_n))
}
