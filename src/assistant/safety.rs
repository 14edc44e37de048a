use crate::corpus::normalize::ingredient_line;
use crate::db::models::Candidate;
use crate::dietary::lexicon::{DietaryCategory, DietaryLexicon};

/// Drop candidates with any ingredient line matching a disallow pattern of a
/// requested category. Only ever removes; tags and overrides are not
/// consulted, and candidates without ingredient data pass.
pub fn filter_unsafe<S: AsRef<str>>(
    candidates: Vec<Candidate>,
    allergens: &[S],
    lexicon: &DietaryLexicon,
) -> Vec<Candidate> {
    let categories: Vec<&DietaryCategory> = allergens
        .iter()
        .filter_map(|id| lexicon.category(id.as_ref()))
        .collect();

    if categories.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|candidate| is_safe(candidate, &categories))
        .collect()
}

fn is_safe(candidate: &Candidate, categories: &[&DietaryCategory]) -> bool {
    candidate.ingredients.iter().all(|ingredient| {
        let line = ingredient_line(ingredient);
        !categories.iter().any(|category| category.is_disallowed(&line))
    })
}
