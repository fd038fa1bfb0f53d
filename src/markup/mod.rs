//! Inline markup and template interpolation, producing text nodes.

pub mod format;
pub mod template;
pub mod tokenizer;

pub use format::{format_text, format_text_strict, format_text_with, FormatOptions, Formatted};
pub use template::{translate, translate_with, TemplateValue, TemplateValues};
