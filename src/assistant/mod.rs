// Free-text assistant: intent -> tiered retrieval -> safety filter -> cards

pub mod intent;
pub mod query;
pub mod safety;

use crate::config::AssistantConfig;
use crate::db::{self, models::*, DbPool};
use crate::dietary::lexicon::DietaryLexicon;
use crate::error::{Error, Result};
use intent::{extract_intent, Intent};
use query::{build_query, Query};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

pub const FALLBACK_REPLY: &str =
    "I couldn't find exact matches with your constraints. Here are some recent recipes you might adapt.";

/// Which retrieval tier produced the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Strong,
    Weak,
    Recent,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Strong => "strong",
            Tier::Weak => "weak",
            Tier::Recent => "recent",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub reply: String,
    pub tier: Tier,
    pub suggestions: Vec<RecipeCard>,
}

/// Escalate strong -> weak -> recent, stopping at the first non-empty tier.
/// The weak tier only runs when it actually constrains something.
pub async fn retrieve(
    pool: &DbPool,
    query: &Query,
    config: &AssistantConfig,
) -> Result<(Tier, Vec<Candidate>)> {
    let strong = db::recipes::fetch_candidates(pool, config.candidate_limit, |card| {
        query.strong.matches(card)
    })
    .await?;
    if !strong.is_empty() {
        return Ok((Tier::Strong, strong));
    }

    if !query.weak.is_unconstrained() {
        let weak = db::recipes::fetch_candidates(pool, config.candidate_limit, |card| {
            query.weak.matches(card)
        })
        .await?;
        if !weak.is_empty() {
            return Ok((Tier::Weak, weak));
        }
    }

    let recent = db::recipes::fetch_candidates(pool, config.recent_limit, |_| true).await?;
    Ok((Tier::Recent, recent))
}

/// Answer a free-text request with safe recipe suggestions
pub async fn suggest(
    pool: &DbPool,
    lexicon: &DietaryLexicon,
    config: &AssistantConfig,
    message: &str,
) -> Result<AssistantReply> {
    if message.trim().is_empty() {
        return Err(Error::Validation("Message must not be empty".to_string()));
    }

    let intent = extract_intent(message, lexicon);
    debug!(
        "Intent: diets={:?} allergens={:?} keywords={:?}",
        intent.diets, intent.allergens, intent.keywords
    );

    let query = build_query(&intent, lexicon);
    let (tier, candidates) = retrieve(pool, &query, config).await?;
    let fetched = candidates.len();

    let safe = safety::filter_unsafe(candidates, &intent.allergens, lexicon);
    info!(
        "Assistant retrieval: tier={} fetched={} safe={}",
        tier,
        fetched,
        safe.len()
    );

    if !safe.is_empty() {
        let suggestions = safe
            .into_iter()
            .take(config.suggestion_limit)
            .map(|c| c.card)
            .collect();

        return Ok(AssistantReply {
            reply: reply_text(&intent),
            intent,
            tier,
            suggestions,
        });
    }

    // Fallback suggestions still go through the allergen filter
    let recent = db::recipes::fetch_candidates(pool, config.recent_limit, |_| true).await?;
    let suggestions = safety::filter_unsafe(recent, &intent.allergens, lexicon)
        .into_iter()
        .take(config.fallback_limit)
        .map(|c| c.card)
        .collect();

    Ok(AssistantReply {
        intent,
        reply: FALLBACK_REPLY.to_string(),
        tier,
        suggestions,
    })
}

/// Acknowledge the constraints that were understood
pub fn reply_text(intent: &Intent) -> String {
    if !intent.has_constraints() {
        return "Here are a few ideas:".to_string();
    }

    let mut parts = Vec::new();
    if !intent.allergens.is_empty() {
        parts.push(format!("avoiding: {}", intent.allergens.join(", ")));
    }
    if !intent.diets.is_empty() {
        parts.push(format!("diet: {}", intent.diets.join(", ")));
    }

    format!("Okay, {}. Here are some ideas:", parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, recipes, recipes::tests::new_recipe};

    #[test]
    fn test_reply_text() {
        let mut intent = Intent::default();
        assert_eq!(reply_text(&intent), "Here are a few ideas:");

        intent.allergens = vec!["nuts".to_string(), "dairy".to_string()];
        assert_eq!(
            reply_text(&intent),
            "Okay, avoiding: nuts, dairy. Here are some ideas:"
        );

        intent.diets = vec!["vegan".to_string()];
        assert_eq!(
            reply_text(&intent),
            "Okay, avoiding: nuts, dairy; diet: vegan. Here are some ideas:"
        );

        intent.allergens.clear();
        assert_eq!(reply_text(&intent), "Okay, diet: vegan. Here are some ideas:");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let pool = memory_pool().await.unwrap();
        let lexicon = DietaryLexicon::builtin().unwrap();

        let result = suggest(&pool, &lexicon, &AssistantConfig::default(), "  \n").await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_weak_tier_when_no_tagged_recipes() {
        let pool = memory_pool().await.unwrap();
        let lexicon = DietaryLexicon::builtin().unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Lemon Chicken Dinner", &["chicken"], &[]))
            .await
            .unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Oat Porridge", &["oats"], &[]))
            .await
            .unwrap();

        let intent = extract_intent("shellfish allergy, dinner please", &lexicon);
        let query = build_query(&intent, &lexicon);
        let (tier, candidates) = retrieve(&pool, &query, &AssistantConfig::default())
            .await
            .unwrap();

        assert_eq!(tier, Tier::Weak);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].card.title, "Lemon Chicken Dinner");
    }

    #[tokio::test]
    async fn test_recent_tier_when_nothing_matches() {
        let pool = memory_pool().await.unwrap();
        let lexicon = DietaryLexicon::builtin().unwrap();
        for title in ["First", "Second"] {
            recipes::insert_recipe(&pool, &new_recipe(title, &["rice"], &[]))
                .await
                .unwrap();
        }

        let reply = suggest(&pool, &lexicon, &AssistantConfig::default(), "kosher brisket")
            .await
            .unwrap();

        assert_eq!(reply.tier, Tier::Recent);
        assert_eq!(reply.reply, "Okay, diet: kosher. Here are some ideas:");
        let titles: Vec<_> = reply.suggestions.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Second", "First"]);
    }

    #[tokio::test]
    async fn test_fallback_suggestions_stay_safe() {
        let pool = memory_pool().await.unwrap();
        let lexicon = DietaryLexicon::builtin().unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Plain Rice", &["rice"], &[]))
            .await
            .unwrap();
        recipes::insert_recipe(&pool, &new_recipe("Peanut Noodles", &["peanuts"], &["nut-free"]))
            .await
            .unwrap();

        let reply = suggest(&pool, &lexicon, &AssistantConfig::default(), "no nuts please")
            .await
            .unwrap();

        assert_eq!(reply.tier, Tier::Strong);
        assert_eq!(reply.reply, FALLBACK_REPLY);
        let titles: Vec<_> = reply.suggestions.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Plain Rice"]);
    }
}
