use crate::config::lexicon::{CategoryEntry, DietEntry, LexiconConfig};
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::path::Path;
use tracing::info;

/// An allergen category with its compiled patterns
#[derive(Debug, Clone)]
pub struct DietaryCategory {
    pub id: String,
    /// Canonical "-free" tag, lower-case
    pub tag: String,
    /// Words in a user message that request this category
    pub mentions: Vec<Regex>,
    /// Text whose presence means the allergen is present
    pub disallow: Vec<Regex>,
    /// Explicit "-free" labelling that wins over a disallow match
    pub overrides: Vec<Regex>,
    /// Tag values that mark a recipe as safe in the store
    pub preferred_tags: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub struct DietLabel {
    pub id: String,
    pub mentions: Vec<Regex>,
    pub preferred_tags: Vec<Regex>,
}

/// Immutable pattern tables shared by the tagger, the query builder and the
/// safety filter. Load once and pass by reference.
#[derive(Debug, Clone)]
pub struct DietaryLexicon {
    categories: Vec<DietaryCategory>,
    diets: Vec<DietLabel>,
}

impl DietaryCategory {
    pub fn is_disallowed(&self, text: &str) -> bool {
        self.disallow.iter().any(|re| re.is_match(text))
    }

    pub fn is_overridden(&self, text: &str) -> bool {
        self.overrides.iter().any(|re| re.is_match(text))
    }

    /// Case-insensitive comparison against the canonical tag
    pub fn is_canonical_tag(&self, tag: &str) -> bool {
        tag.trim().eq_ignore_ascii_case(&self.tag)
    }

    pub fn is_mentioned(&self, text: &str) -> bool {
        self.mentions.iter().any(|re| re.is_match(text))
    }
}

impl DietLabel {
    pub fn is_mentioned(&self, text: &str) -> bool {
        self.mentions.iter().any(|re| re.is_match(text))
    }
}

impl DietaryLexicon {
    /// Compile a validated lexicon configuration
    pub fn compile(config: &LexiconConfig) -> Result<Self> {
        config.validate()?;

        let categories = config
            .categories
            .iter()
            .map(compile_category)
            .collect::<Result<Vec<_>>>()?;

        let diets = config
            .diets
            .iter()
            .map(compile_diet)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { categories, diets })
    }

    /// The lexicon embedded at build time
    pub fn builtin() -> Result<Self> {
        Self::compile(&LexiconConfig::builtin()?)
    }

    /// Load from a YAML file when a path is configured, else use the built-in lexicon
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                info!("Loading dietary lexicon from {}", path.display());
                LexiconConfig::from_file(path)?
            }
            None => LexiconConfig::builtin()?,
        };

        let lexicon = Self::compile(&config)?;
        info!(
            "Dietary lexicon ready: {} categories, {} diets",
            lexicon.categories.len(),
            lexicon.diets.len()
        );
        Ok(lexicon)
    }

    pub fn categories(&self) -> &[DietaryCategory] {
        &self.categories
    }

    pub fn diets(&self) -> &[DietLabel] {
        &self.diets
    }

    pub fn category(&self, id: &str) -> Option<&DietaryCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn diet(&self, id: &str) -> Option<&DietLabel> {
        self.diets.iter().find(|d| d.id == id)
    }
}

fn compile_category(entry: &CategoryEntry) -> Result<DietaryCategory> {
    let context = |field: &str| format!("category {} {field}", entry.id);

    Ok(DietaryCategory {
        id: entry.id.trim().to_string(),
        tag: entry.tag.trim().to_lowercase(),
        mentions: compile_patterns(&entry.mentions, &context("mentions"))?,
        disallow: compile_patterns(&entry.disallow, &context("disallow"))?,
        overrides: compile_patterns(&entry.overrides, &context("overrides"))?,
        preferred_tags: compile_patterns(&entry.preferred_tags, &context("preferred_tags"))?,
    })
}

fn compile_diet(entry: &DietEntry) -> Result<DietLabel> {
    let context = |field: &str| format!("diet {} {field}", entry.id);

    Ok(DietLabel {
        id: entry.id.trim().to_string(),
        mentions: compile_patterns(&entry.mentions, &context("mentions"))?,
        preferred_tags: compile_patterns(&entry.preferred_tags, &context("preferred_tags"))?,
    })
}

fn compile_patterns(patterns: &[String], context: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::Config(format!("Invalid pattern in {context}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> DietaryLexicon {
        DietaryLexicon::builtin().unwrap()
    }

    #[test]
    fn test_builtin_compiles() {
        let lexicon = lexicon();
        assert_eq!(lexicon.categories().len(), 6);
        assert_eq!(lexicon.diets().len(), 6);
        assert_eq!(lexicon.category("nuts").unwrap().tag, "nut-free");
        assert!(lexicon.category("sesame").is_none());
    }

    #[test]
    fn test_disallow_patterns_respect_word_boundaries() {
        let lexicon = lexicon();
        let gluten = lexicon.category("gluten").unwrap();

        assert!(gluten.is_disallowed("2 cups Flour"));
        assert!(gluten.is_disallowed("toasted breadcrumbs"));
        assert!(!gluten.is_disallowed("cauliflower rice"));
        assert!(!gluten.is_disallowed("buckwheat groats"));

        let egg = lexicon.category("egg").unwrap();
        assert!(egg.is_disallowed("3 EGGS"));
        assert!(!egg.is_disallowed("eggplant"));

        let nuts = lexicon.category("nuts").unwrap();
        assert!(nuts.is_disallowed("pine nuts"));
        assert!(nuts.is_disallowed("almond"));
        assert!(!nuts.is_disallowed("nutmeg"));
        assert!(!nuts.is_disallowed("coconut milk"));
    }

    #[test]
    fn test_overrides() {
        let lexicon = lexicon();
        let gluten = lexicon.category("gluten").unwrap();
        assert!(gluten.is_overridden("gluten-free flour"));
        assert!(gluten.is_overridden("Gluten Free bread"));
        assert!(gluten.is_overridden("GF pasta"));

        let shellfish = lexicon.category("shellfish").unwrap();
        assert!(shellfish.is_overridden("shellfish-free"));
        assert!(shellfish.is_overridden("shell fish free"));
    }

    #[test]
    fn test_preferred_tags_are_anchored() {
        let lexicon = lexicon();
        let dairy = lexicon.category("dairy").unwrap();
        let matches = |tag: &str| dairy.preferred_tags.iter().any(|re| re.is_match(tag));

        assert!(matches("dairy-free"));
        assert!(matches("Lactose Free"));
        assert!(!matches("mostly dairy-free"));
    }

    #[test]
    fn test_canonical_tag_is_case_insensitive() {
        let lexicon = lexicon();
        let soy = lexicon.category("soy").unwrap();
        assert!(soy.is_canonical_tag("Soy-Free"));
        assert!(soy.is_canonical_tag(" soy-free "));
        assert!(!soy.is_canonical_tag("soy free"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let config = LexiconConfig::from_yaml(
            r#"
version: 1
categories:
  - id: broken
    tag: broken-free
    disallow: ['(unclosed']
"#,
        )
        .unwrap();

        let err = DietaryLexicon::compile(&config).unwrap_err();
        assert!(err.to_string().contains("category broken disallow"));
    }
}
