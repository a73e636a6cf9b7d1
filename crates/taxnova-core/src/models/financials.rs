//! Figures read off a salary tax certificate (Form 16).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three monetary fields extracted from a Form 16.
///
/// Every field is zero when its label could not be found in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFinancials {
    /// Gross salary for the year.
    pub gross_salary: Decimal,

    /// Tax already withheld by the employer (TDS).
    pub tax_deducted_at_source: Decimal,

    /// Taxable income as stated on the certificate.
    pub taxable_income: Decimal,
}

impl ExtractedFinancials {
    pub fn new(gross_salary: Decimal, tax_deducted_at_source: Decimal, taxable_income: Decimal) -> Self {
        Self {
            gross_salary,
            tax_deducted_at_source,
            taxable_income,
        }
    }

    /// True when nothing at all was recognised.
    pub fn is_empty(&self) -> bool {
        self.gross_salary.is_zero()
            && self.tax_deducted_at_source.is_zero()
            && self.taxable_income.is_zero()
    }
}
