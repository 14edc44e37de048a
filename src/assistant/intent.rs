use crate::dietary::lexicon::DietaryLexicon;
use serde::{Deserialize, Serialize};

/// Structured reading of a free-text request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Diet label ids, lexicon order
    pub diets: Vec<String>,
    /// Allergen category ids, lexicon order
    pub allergens: Vec<String>,
    /// Topical tokens, first occurrence order
    pub keywords: Vec<String>,
}

impl Intent {
    pub fn has_constraints(&self) -> bool {
        !self.diets.is_empty() || !self.allergens.is_empty()
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "no", "not", "is", "are", "am", "with", "without",
    "for", "to", "of", "in", "on", "my", "mom", "i", "me", "you", "she", "he", "we", "they",
    "it", "what", "have", "want", "need", "like", "please", "can", "could", "would", "make",
    "eat", "something", "some", "any", "ideas", "idea", "give", "show", "find", "recipe",
    "recipes", "allergy", "allergic", "free",
];

/// Parse a user message into diets, allergens and keywords. Pure.
pub fn extract_intent(message: &str, lexicon: &DietaryLexicon) -> Intent {
    let text = message.to_lowercase();

    let diets = lexicon
        .diets()
        .iter()
        .filter(|diet| diet.is_mentioned(&text))
        .map(|diet| diet.id.clone())
        .collect();

    let allergens = lexicon
        .categories()
        .iter()
        .filter(|category| category.is_mentioned(&text))
        .map(|category| category.id.clone())
        .collect();

    Intent {
        diets,
        allergens,
        keywords: extract_keywords(&text, lexicon),
    }
}

fn extract_keywords(text: &str, lexicon: &DietaryLexicon) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for token in cleaned.split_whitespace() {
        if STOPWORDS.contains(&token) || is_dietary_mention(token, lexicon) {
            continue;
        }
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

fn is_dietary_mention(token: &str, lexicon: &DietaryLexicon) -> bool {
    lexicon.diets().iter().any(|d| d.is_mentioned(token))
        || lexicon.categories().iter().any(|c| c.is_mentioned(token))
}
