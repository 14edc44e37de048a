// Dietary lexicon, allergen classification and the batch "-free" tagger

pub mod classifier;
pub mod lexicon;
pub mod tagger;

pub use lexicon::{DietLabel, DietaryCategory, DietaryLexicon};
pub use tagger::{TaggingMode, TaggingReport};
