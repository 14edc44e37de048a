use crate::assistant::intent::Intent;
use crate::db::models::RecipeCard;
use crate::dietary::lexicon::DietaryLexicon;
use regex::Regex;

/// Keywords used for title/tag matching
pub const MAX_QUERY_KEYWORDS: usize = 6;
/// Shorter keywords are too noisy to match on
pub const MIN_KEYWORD_LEN: usize = 3;

/// A storage-agnostic filter over recipe cards
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Matches every recipe
    Unconstrained,
    /// Any tag matches any of these preferred-tag patterns
    Tags(Vec<Regex>),
    /// Title or any tag contains any of these lower-case keywords
    Keywords(Vec<String>),
}

impl Predicate {
    pub fn matches(&self, card: &RecipeCard) -> bool {
        match self {
            Predicate::Unconstrained => true,
            Predicate::Tags(patterns) => card
                .tags
                .iter()
                .any(|tag| patterns.iter().any(|re| re.is_match(tag.trim()))),
            Predicate::Keywords(keywords) => {
                let title = card.title.to_lowercase();
                let tags: Vec<String> = card.tags.iter().map(|t| t.to_lowercase()).collect();
                keywords.iter().any(|kw| {
                    title.contains(kw.as_str()) || tags.iter().any(|t| t.contains(kw.as_str()))
                })
            }
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Predicate::Unconstrained)
    }
}

/// Strong (tag-based) and weak (keyword-based) retrieval predicates
#[derive(Debug, Clone)]
pub struct Query {
    pub strong: Predicate,
    pub weak: Predicate,
}

/// Turn an intent into tiered predicates
pub fn build_query(intent: &Intent, lexicon: &DietaryLexicon) -> Query {
    let mut preferred: Vec<Regex> = Vec::new();

    for id in &intent.diets {
        if let Some(diet) = lexicon.diet(id) {
            preferred.extend(diet.preferred_tags.iter().cloned());
        }
    }
    for id in &intent.allergens {
        if let Some(category) = lexicon.category(id) {
            preferred.extend(category.preferred_tags.iter().cloned());
        }
    }

    let weak = keyword_predicate(&intent.keywords);
    let strong = if preferred.is_empty() {
        weak.clone()
    } else {
        Predicate::Tags(preferred)
    };

    Query { strong, weak }
}

fn keyword_predicate(keywords: &[String]) -> Predicate {
    let usable: Vec<String> = keywords
        .iter()
        .filter(|kw| kw.chars().count() >= MIN_KEYWORD_LEN)
        .take(MAX_QUERY_KEYWORDS)
        .map(|kw| kw.to_lowercase())
        .collect();

    if usable.is_empty() {
        Predicate::Unconstrained
    } else {
        Predicate::Keywords(usable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::intent::extract_intent;
    use crate::corpus::document::Difficulty;

    fn card(title: &str, tags: &[&str]) -> RecipeCard {
        RecipeCard {
            id: 1,
            title: title.to_string(),
            image_url: String::new(),
            difficulty: Difficulty::Easy,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            prep_time_min: 0,
        }
    }

    fn query_for(message: &str) -> Query {
        let lexicon = DietaryLexicon::builtin().unwrap();
        build_query(&extract_intent(message, &lexicon), &lexicon)
    }

    #[test]
    fn test_strong_uses_preferred_tags() {
        let query = query_for("vegan dinner, no nuts");

        assert!(matches!(query.strong, Predicate::Tags(_)));
        assert!(query.strong.matches(&card("Lentil Soup", &["Vegan"])));
        assert!(query.strong.matches(&card("Cookies", &["nut-free"])));
        assert!(query.strong.matches(&card("Cookies", &["peanut free"])));
        assert!(!query.strong.matches(&card("Vegan Dinner Bowl", &["dinner"])));
        // Anchored: "non-vegan" is not a vegan tag
        assert!(!query.strong.matches(&card("Steak", &["non-vegan"])));

        assert!(query.weak.matches(&card("Quick Dinner", &[])));
        assert!(!query.weak.matches(&card("Lentil Soup", &["Vegan"])));
    }

    #[test]
    fn test_strong_falls_back_to_keywords() {
        let query = query_for("something with mushrooms");
        assert!(matches!(query.strong, Predicate::Keywords(_)));
        // Literal containment, no stemming
        assert!(!query.strong.matches(&card("Mushroom Risotto", &[])));
        assert!(query.strong.matches(&card("Creamy risotto", &["mushrooms"])));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_on_title_and_tags() {
        let predicate = keyword_predicate(&["dinner".to_string()]);
        assert!(predicate.matches(&card("Weeknight DINNER", &[])));
        assert!(predicate.matches(&card("Stew", &["Dinner-Party"])));
        assert!(!predicate.matches(&card("Stew", &["lunch"])));
    }

    #[test]
    fn test_short_keywords_dropped_and_capped() {
        let keywords: Vec<String> = ["ab", "pie", "one", "two", "six", "ten", "red", "hot", "jam"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        match keyword_predicate(&keywords) {
            Predicate::Keywords(used) => {
                assert_eq!(used, ["pie", "one", "two", "six", "ten", "red"]);
            }
            other => panic!("unexpected predicate {other:?}"),
        }

        assert!(keyword_predicate(&["ab".to_string()]).is_unconstrained());
    }

    #[test]
    fn test_empty_intent_is_unconstrained() {
        let query = query_for("please, something?");
        assert!(query.strong.is_unconstrained());
        assert!(query.weak.is_unconstrained());
    }
}
