//! Deduction schedule and tax computation results.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed deduction categories applied before the bracket formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    /// Section 80C investments.
    Investments,
    /// Section 80D health insurance premium.
    HealthInsurance,
    /// Section 24 home loan interest.
    HomeLoanInterest,
}

impl DeductionCategory {
    pub const ALL: [DeductionCategory; 3] = [
        DeductionCategory::Investments,
        DeductionCategory::HealthInsurance,
        DeductionCategory::HomeLoanInterest,
    ];

    /// Human-readable label including the statutory section.
    pub fn label(&self) -> &'static str {
        match self {
            DeductionCategory::Investments => "Section 80C (Investments)",
            DeductionCategory::HealthInsurance => "Section 80D (Health Insurance)",
            DeductionCategory::HomeLoanInterest => "Section 24 (Home Loan Interest)",
        }
    }
}

impl fmt::Display for DeductionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Amount allowed per deduction category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeductionSchedule {
    entries: BTreeMap<DeductionCategory, Decimal>,
}

impl DeductionSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: DeductionCategory, amount: Decimal) {
        self.entries.insert(category, amount);
    }

    pub fn get(&self, category: DeductionCategory) -> Option<Decimal> {
        self.entries.get(&category).copied()
    }

    /// Entries in category order.
    pub fn iter(&self) -> impl Iterator<Item = (DeductionCategory, Decimal)> + '_ {
        self.entries.iter().map(|(c, a)| (*c, *a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all deductions.
    pub fn total(&self) -> Decimal {
        self.entries.values().copied().sum()
    }
}

/// How the difference between liability and withheld tax is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxDuePolicy {
    /// `max(0, liability - tds)`; over-withholding is reported as nothing due.
    #[default]
    Floored,
    /// `liability - tds`; a negative value is a refund due.
    Signed,
}

impl TaxDuePolicy {
    pub fn apply(&self, liability: Decimal, tds: Decimal) -> Decimal {
        let due = liability - tds;
        match self {
            TaxDuePolicy::Floored => due.max(Decimal::ZERO),
            TaxDuePolicy::Signed => due,
        }
    }
}

impl fmt::Display for TaxDuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxDuePolicy::Floored => write!(f, "floored"),
            TaxDuePolicy::Signed => write!(f, "signed"),
        }
    }
}

/// Interpretation of a tax-due figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "amount", rename_all = "snake_case")]
pub enum TaxDueStatus {
    /// Remaining tax payable.
    Payable(Decimal),
    /// Withheld tax exceeds liability by this amount.
    Refund(Decimal),
    /// Nothing payable, nothing refundable.
    Settled,
}

/// Full outcome of a tax estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    /// Deductions applied, per category.
    pub deductions: DeductionSchedule,

    /// Sum of `deductions`.
    pub total_deductions: Decimal,

    /// `max(0, taxable_income - total_deductions)`.
    pub taxable_income_after_deductions: Decimal,

    /// Liability from the bracket formula.
    pub tax_liability: Decimal,

    /// Tax already withheld, credited against the liability.
    pub tax_deducted_at_source: Decimal,

    /// Liability net of withheld tax, per `policy`.
    pub tax_due: Decimal,

    /// Policy used to compute `tax_due`.
    pub policy: TaxDuePolicy,
}

impl TaxComputationResult {
    pub fn status(&self) -> TaxDueStatus {
        if self.tax_due > Decimal::ZERO {
            TaxDueStatus::Payable(self.tax_due)
        } else if self.tax_due < Decimal::ZERO {
            TaxDueStatus::Refund(-self.tax_due)
        } else {
            TaxDueStatus::Settled
        }
    }
}
