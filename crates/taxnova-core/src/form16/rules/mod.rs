//! Rule-based field extractors for Form 16 certificates.

pub mod amounts;
pub mod patterns;

pub use amounts::{format_inr_amount, parse_inr_amount, LabeledAmountExtractor};
pub use patterns::*;

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// The labelled figures read off a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form16Field {
    GrossSalary,
    TaxDeductedAtSource,
    TaxableIncome,
}

impl Form16Field {
    pub const ALL: [Form16Field; 3] = [
        Form16Field::GrossSalary,
        Form16Field::TaxDeductedAtSource,
        Form16Field::TaxableIncome,
    ];

    /// Label as printed on the certificate.
    pub fn label(&self) -> &'static str {
        match self {
            Form16Field::GrossSalary => "Gross Salary",
            Form16Field::TaxDeductedAtSource => "Tax Deducted at Source",
            Form16Field::TaxableIncome => "Taxable Income",
        }
    }

    pub fn pattern(&self) -> &'static Regex {
        match self {
            Form16Field::GrossSalary => &GROSS_SALARY,
            Form16Field::TaxDeductedAtSource => &TAX_DEDUCTED_AT_SOURCE,
            Form16Field::TaxableIncome => &TAXABLE_INCOME,
        }
    }
}

/// A value found in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
