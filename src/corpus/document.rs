//! Recipe documents as they arrive from imports or the store.
//!
//! Every field is optional on the wire. Fields with the wrong shape (a string
//! where a list is expected, a number where text is expected, `null`) are read
//! as empty instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub steps: Vec<Step>,
    #[serde(default, alias = "ingredientText", deserialize_with = "lenient_text")]
    pub ingredient_text: Option<String>,
    #[serde(default, alias = "prepTimeMin", deserialize_with = "lenient_number")]
    pub prep_time_min: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub difficulty: Option<String>,
    #[serde(default, alias = "imageUrl", deserialize_with = "lenient_text")]
    pub image_url: Option<String>,
}

/// One ingredient line: a name and a free-text quantity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IngredientRepr")]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StepRepr")]
pub struct Step {
    pub text: String,
    pub duration_sec: Option<i64>,
    pub ingredients_used: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a stored or imported value, defaulting to easy
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientRepr {
    Text(String),
    Fields {
        #[serde(default, deserialize_with = "lenient_text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        quantity: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        note: Option<String>,
    },
}

impl From<IngredientRepr> for Ingredient {
    fn from(repr: IngredientRepr) -> Self {
        match repr {
            IngredientRepr::Text(name) => Ingredient {
                name,
                quantity: None,
                note: None,
            },
            IngredientRepr::Fields {
                name,
                quantity,
                note,
            } => Ingredient {
                name: name.unwrap_or_default(),
                quantity,
                note,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepRepr {
    Text(String),
    Fields {
        #[serde(default, deserialize_with = "lenient_text")]
        text: Option<String>,
        #[serde(default, alias = "durationSec", deserialize_with = "lenient_number")]
        duration_sec: Option<i64>,
        #[serde(default, alias = "ingredientsUsed", deserialize_with = "lenient_list")]
        ingredients_used: Vec<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        note: Option<String>,
    },
}

impl From<StepRepr> for Step {
    fn from(repr: StepRepr) -> Self {
        match repr {
            StepRepr::Text(text) => Step {
                text,
                ..Step::default()
            },
            StepRepr::Fields {
                text,
                duration_sec,
                ingredients_used,
                note,
            } => Step {
                text: text.unwrap_or_default(),
                duration_sec,
                ingredients_used,
                note,
            },
        }
    }
}

/// A list field; anything but an array reads as empty and unreadable items are dropped
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Free text; numbers and booleans are stringified, everything else is absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_document() {
        let doc: RecipeDocument = serde_json::from_value(json!({
            "title": "Simple Pancakes",
            "ingredients": [
                { "name": "flour", "quantity": "200g" },
                { "name": "egg", "quantity": 1 }
            ],
            "ingredientText": "flour egg milk sugar",
            "steps": [{ "order": 1, "text": "Mix dry ingredients", "durationSec": 60 }],
            "prepTimeMin": 20,
            "difficulty": "easy",
            "tags": ["breakfast", "vegetarian"]
        }))
        .unwrap();

        assert_eq!(doc.title, "Simple Pancakes");
        assert_eq!(doc.ingredients.len(), 2);
        assert_eq!(doc.ingredients[1].quantity.as_deref(), Some("1"));
        assert_eq!(doc.steps[0].duration_sec, Some(60));
        assert_eq!(doc.ingredient_text.as_deref(), Some("flour egg milk sugar"));
        assert_eq!(doc.prep_time_min, Some(20));
        assert_eq!(doc.tags, ["breakfast", "vegetarian"]);
    }

    #[test]
    fn test_malformed_fields_read_as_empty() {
        let doc: RecipeDocument = serde_json::from_value(json!({
            "title": null,
            "ingredients": "flour, eggs",
            "steps": { "text": "not a list" },
            "tags": "vegan",
            "prepTimeMin": "quick"
        }))
        .unwrap();

        assert_eq!(doc.title, "");
        assert!(doc.ingredients.is_empty());
        assert!(doc.steps.is_empty());
        assert!(doc.tags.is_empty());
        assert_eq!(doc.prep_time_min, None);
    }

    #[test]
    fn test_string_items_and_bad_items() {
        let doc: RecipeDocument = serde_json::from_value(json!({
            "title": "Toast",
            "ingredients": ["bread", 42, { "name": "butter" }, null],
            "steps": ["Toast the bread", { "text": "Spread", "note": "thinly" }],
            "tags": ["breakfast", 7]
        }))
        .unwrap();

        let names: Vec<_> = doc.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["bread", "butter"]);
        assert_eq!(doc.steps[0].text, "Toast the bread");
        assert_eq!(doc.steps[1].note.as_deref(), Some("thinly"));
        assert_eq!(doc.tags, ["breakfast"]);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!(Difficulty::parse_lenient(Some("Hard")), Difficulty::Hard);
        assert_eq!(Difficulty::parse_lenient(Some("extreme")), Difficulty::Easy);
        assert_eq!(Difficulty::parse_lenient(None), Difficulty::Easy);
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }
}
