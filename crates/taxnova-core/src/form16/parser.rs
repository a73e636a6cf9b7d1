//! Form 16 parser: labelled amounts to `ExtractedFinancials`.

use std::collections::HashMap;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::financials::ExtractedFinancials;

use super::rules::{ExtractionMatch, FieldExtractor, Form16Field, LabeledAmountExtractor};

/// Result of Form 16 extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted figures; missing ones are zero.
    pub financials: ExtractedFinancials,
    /// Where each recognised figure came from.
    pub matches: HashMap<Form16Field, ExtractionMatch<Decimal>>,
    /// Extraction warnings (one per field that defaulted to zero).
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based Form 16 parser.
///
/// Never fails: any field whose label is not found defaults to zero.
pub struct Form16Parser {
    extractors: Vec<LabeledAmountExtractor>,
}

impl Form16Parser {
    pub fn new() -> Self {
        Self {
            extractors: Form16Field::ALL
                .iter()
                .map(|f| LabeledAmountExtractor::new(*f))
                .collect(),
        }
    }

    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut matches: HashMap<Form16Field, ExtractionMatch<Decimal>> = HashMap::new();
        let mut warnings = Vec::new();

        for extractor in &self.extractors {
            match extractor.extract(text) {
                Some(found) => {
                    debug!("{}: {} ({:?})", extractor.field().label(), found.value, found.source);
                    matches.insert(extractor.field(), found);
                }
                None => {
                    warnings.push(format!("{} not found, using 0", extractor.field().label()));
                }
            }
        }

        let value = |field: Form16Field| {
            matches.get(&field).map(|m| m.value).unwrap_or(Decimal::ZERO)
        };

        let financials = ExtractedFinancials::new(
            value(Form16Field::GrossSalary),
            value(Form16Field::TaxDeductedAtSource),
            value(Form16Field::TaxableIncome),
        );

        ExtractionResult {
            financials,
            matches,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for Form16Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the three Form 16 figures from plain text.
pub fn extract_financials(text: &str) -> ExtractedFinancials {
    Form16Parser::new().parse(text).financials
}
