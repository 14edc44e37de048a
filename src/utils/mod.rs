// Request input sanitization
pub mod sanitize;
