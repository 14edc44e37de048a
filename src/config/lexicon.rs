use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Lexicon shipped with the binary, used when `LEXICON_PATH` is not set
pub const BUILTIN_LEXICON: &str = include_str!("../../config/lexicon.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    pub version: u32,
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub diets: Vec<DietEntry>,
}

/// Allergen category as written in the lexicon file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: String,
    pub tag: String,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub disallow: Vec<String>,
    #[serde(default)]
    pub overrides: Vec<String>,
    #[serde(default)]
    pub preferred_tags: Vec<String>,
}

/// Diet label as written in the lexicon file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietEntry {
    pub id: String,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub preferred_tags: Vec<String>,
}

impl LexiconConfig {
    /// Load lexicon configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read lexicon from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            Error::Config(format!(
                "Invalid lexicon {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Parse and validate lexicon YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: LexiconConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse lexicon: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// The lexicon embedded at build time
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_LEXICON)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported lexicon version: {}. Expected version 1",
                self.version
            )));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.id.trim().is_empty() {
                return Err(Error::Config("Category id cannot be empty".to_string()));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate category id: {}",
                    category.id
                )));
            }
            if category.tag.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Category {} must declare a tag",
                    category.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for diet in &self.diets {
            if diet.id.trim().is_empty() {
                return Err(Error::Config("Diet id cannot be empty".to_string()));
            }
            if !seen.insert(diet.id.as_str()) {
                return Err(Error::Config(format!("Duplicate diet id: {}", diet.id)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_builtin_lexicon_is_valid() {
        let config = LexiconConfig::builtin().unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.categories.len(), 6);
        assert_eq!(config.diets.len(), 6);

        let ids: Vec<_> = config.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["gluten", "dairy", "nuts", "egg", "soy", "shellfish"]);
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
version: 1
categories:
  - id: sesame
    tag: sesame-free
    mentions: ['\bsesame\b']
    disallow: ['\bsesame\b', '\btahini\b']
    overrides: ['\bsesame[-\s]?free\b']
    preferred_tags: ['^sesame[-\s]?free$']
"#;

        let file = create_test_config(config_content);
        let config = LexiconConfig::from_file(file.path()).unwrap();

        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].tag, "sesame-free");
        assert_eq!(config.categories[0].disallow.len(), 2);
        assert!(config.diets.is_empty());
    }

    #[test]
    fn test_reject_duplicate_ids() {
        let config_content = r#"
version: 1
categories:
  - id: egg
    tag: egg-free
  - id: egg
    tag: eggless
"#;

        let file = create_test_config(config_content);
        let result = LexiconConfig::from_file(file.path());

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Duplicate category id"));
    }

    #[test]
    fn test_reject_missing_tag() {
        let result = LexiconConfig::from_yaml(
            r#"
version: 1
categories:
  - id: egg
    tag: "  "
"#,
        );

        assert!(result.unwrap_err().to_string().contains("must declare a tag"));
    }

    #[test]
    fn test_reject_unknown_version() {
        let result = LexiconConfig::from_yaml("version: 2\ncategories: []\n");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported lexicon version"));
    }

    #[test]
    fn test_missing_file() {
        let result = LexiconConfig::from_file("/nonexistent/lexicon.yaml");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read lexicon"));
    }
}
