//! Tax estimate: deductions, after-deduction income, liability and tax due.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::financials::ExtractedFinancials;
use crate::models::tax::{TaxComputationResult, TaxDuePolicy};

use super::brackets::tax_liability;
use super::deductions::identify_deductions;

/// Estimates liability from extracted figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxEstimator {
    policy: TaxDuePolicy,
}

impl TaxEstimator {
    /// Create an estimator using the floored tax-due policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tax-due policy.
    pub fn with_policy(mut self, policy: TaxDuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TaxDuePolicy {
        self.policy
    }

    pub fn estimate(&self, financials: &ExtractedFinancials) -> TaxComputationResult {
        self.estimate_income(financials.taxable_income, financials.tax_deducted_at_source)
    }

    pub fn estimate_income(&self, taxable_income: Decimal, tds: Decimal) -> TaxComputationResult {
        let deductions = identify_deductions(taxable_income);
        let total_deductions = deductions.total();
        let after_deductions = (taxable_income - total_deductions).max(Decimal::ZERO);
        let liability = tax_liability(after_deductions);
        let tax_due = self.policy.apply(liability, tds);

        debug!(
            "Estimate: income={} deductions={} after={} liability={} due={} ({})",
            taxable_income, total_deductions, after_deductions, liability, tax_due, self.policy
        );

        TaxComputationResult {
            deductions,
            total_deductions,
            taxable_income_after_deductions: after_deductions,
            tax_liability: liability,
            tax_deducted_at_source: tds,
            tax_due,
            policy: self.policy,
        }
    }
}

/// Estimate tax for extracted figures under a policy.
pub fn estimate(financials: &ExtractedFinancials, policy: TaxDuePolicy) -> TaxComputationResult {
    TaxEstimator::new().with_policy(policy).estimate(financials)
}
