//! Form 16 field extraction module.

mod parser;
pub mod rules;

pub use parser::{extract_financials, ExtractionResult, Form16Parser};
