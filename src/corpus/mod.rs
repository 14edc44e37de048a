// Recipe documents: wire shape, text flattening and bulk import

pub mod document;
pub mod import;
pub mod normalize;

pub use document::{Difficulty, Ingredient, RecipeDocument, Step};
pub use import::{import_file, import_json, ImportReport};
