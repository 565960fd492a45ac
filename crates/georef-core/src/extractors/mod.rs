//! Extractors that turn document text into raw coordinate records

pub mod table;

pub use table::{extract, extract_survey_table};
