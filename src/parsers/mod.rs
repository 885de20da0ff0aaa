pub mod attributes;
pub mod matcher;
pub mod names;
pub mod table;
pub mod tags;
pub mod text;

#[cfg(test)]
mod tests;

pub use attributes::{Attributes, split_attributes};
pub use matcher::{CaseMode, TagMatch, TagPattern};
pub use names::TagName;
pub use table::{decompose_table, project_table};
pub use tags::{Extraction, Extractor, Skipped};
pub use text::find_sentences_with_word;
