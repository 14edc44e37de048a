use crate::corpus::document::{Ingredient, RecipeDocument, Step};

/// Flatten a recipe into one searchable blob: title, tags, ingredient lines
/// ("name quantity note") and steps ("text note"), space-joined.
///
/// Missing parts are skipped, so a document with nothing but a title (or
/// nothing at all) still yields a usable, possibly empty, string.
pub fn recipe_text(doc: &RecipeDocument) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_non_empty(&mut parts, doc.title.trim());
    push_non_empty(&mut parts, doc.tags.join(" ").trim());

    for ingredient in &doc.ingredients {
        push_non_empty(&mut parts, &ingredient_detail(ingredient));
    }

    for step in &doc.steps {
        push_non_empty(&mut parts, &step_text(step));
    }

    parts.join(" ")
}

/// "name quantity" for one ingredient, the text the safety filter inspects
pub fn ingredient_line(ingredient: &Ingredient) -> String {
    join_present([Some(ingredient.name.as_str()), ingredient.quantity.as_deref()])
}

/// Ingredient text used for ranking when a recipe does not carry its own
pub fn derived_ingredient_text(ingredients: &[Ingredient]) -> String {
    join_present(ingredients.iter().map(|i| Some(i.name.as_str())))
}

fn ingredient_detail(ingredient: &Ingredient) -> String {
    join_present([
        Some(ingredient.name.as_str()),
        ingredient.quantity.as_deref(),
        ingredient.note.as_deref(),
    ])
}

fn step_text(step: &Step) -> String {
    join_present([Some(step.text.as_str()), step.note.as_deref()])
}

fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_non_empty(parts: &mut Vec<String>, part: &str) {
    if !part.is_empty() {
        parts.push(part.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> RecipeDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_recipe_text_order() {
        let recipe = doc(json!({
            "title": "Garlic Butter Pasta",
            "tags": ["dinner", "quick"],
            "ingredients": [
                { "name": "pasta", "quantity": "200g" },
                { "name": "butter", "quantity": "50g", "note": "salted" }
            ],
            "steps": [{ "text": "Boil pasta", "note": "salt the water" }]
        }));

        assert_eq!(
            recipe_text(&recipe),
            "Garlic Butter Pasta dinner quick pasta 200g butter 50g salted Boil pasta salt the water"
        );
    }

    #[test]
    fn test_recipe_text_tolerates_missing_fields() {
        assert_eq!(recipe_text(&RecipeDocument::default()), "");

        let recipe = doc(json!({ "title": "Mystery", "ingredients": 12, "steps": "stir" }));
        assert_eq!(recipe_text(&recipe), "Mystery");
    }

    #[test]
    fn test_ingredient_line_skips_note() {
        let ingredient = Ingredient {
            name: "almond flour".to_string(),
            quantity: Some("1 cup".to_string()),
            note: Some("sifted".to_string()),
        };
        assert_eq!(ingredient_line(&ingredient), "almond flour 1 cup");
    }

    #[test]
    fn test_derived_ingredient_text() {
        let recipe = doc(json!({ "ingredients": ["flour", { "name": "egg" }, { "quantity": "2" }] }));
        assert_eq!(derived_ingredient_text(&recipe.ingredients), "flour egg");
    }
}
