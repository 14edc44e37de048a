use crate::corpus::{document::RecipeDocument, normalize::recipe_text};
use crate::dietary::lexicon::{DietaryCategory, DietaryLexicon};

/// Decide whether a recipe is safe to carry `category`'s "-free" tag.
///
/// 1. Already tagged with the canonical tag: safe.
/// 2. Any override pattern matches: safe.
/// 3. Any disallow pattern matches: unsafe.
/// 4. Otherwise safe. No evidence of the allergen counts as absence of it.
pub fn decide<S: AsRef<str>>(text: &str, current_tags: &[S], category: &DietaryCategory) -> bool {
    if current_tags
        .iter()
        .any(|tag| category.is_canonical_tag(tag.as_ref()))
    {
        return true;
    }

    if category.is_overridden(text) {
        return true;
    }

    !category.is_disallowed(text)
}

/// Canonical tags a recipe qualifies for but does not carry yet, in lexicon order
pub fn missing_tags(doc: &RecipeDocument, lexicon: &DietaryLexicon) -> Vec<String> {
    let text = recipe_text(doc);

    lexicon
        .categories()
        .iter()
        .filter(|category| {
            let already = doc.tags.iter().any(|t| category.is_canonical_tag(t));
            !already && decide(&text, &doc.tags, category)
        })
        .map(|category| category.tag.clone())
        .collect()
}
