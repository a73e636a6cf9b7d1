//! Fixed deduction schedule.

use rust_decimal::Decimal;

use crate::models::tax::{DeductionCategory, DeductionSchedule};

/// Share of taxable income allowed as Section 80C investments.
pub const INVESTMENT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Section 80C ceiling.
pub const INVESTMENT_CAP: Decimal = Decimal::from_parts(150_000, 0, 0, false, 0);

/// Section 80D flat amount.
pub const HEALTH_INSURANCE_DEDUCTION: Decimal = Decimal::from_parts(25_000, 0, 0, false, 0);

/// Section 24 flat amount.
pub const HOME_LOAN_INTEREST_DEDUCTION: Decimal = Decimal::from_parts(200_000, 0, 0, false, 0);

/// Deductions allowed for a taxable income.
///
/// Negative income is not rejected; it flows through the investment `min`.
pub fn identify_deductions(taxable_income: Decimal) -> DeductionSchedule {
    let mut schedule = DeductionSchedule::new();
    schedule.insert(
        DeductionCategory::Investments,
        (taxable_income * INVESTMENT_RATE).min(INVESTMENT_CAP),
    );
    schedule.insert(DeductionCategory::HealthInsurance, HEALTH_INSURANCE_DEDUCTION);
    schedule.insert(DeductionCategory::HomeLoanInterest, HOME_LOAN_INTEREST_DEDUCTION);
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investment_deduction_below_cap() {
        let schedule = identify_deductions(Decimal::from(1_000_000));
        assert_eq!(schedule.get(DeductionCategory::Investments), Some(Decimal::from(100_000)));
    }

    #[test]
    fn test_investment_deduction_capped() {
        let schedule = identify_deductions(Decimal::from(2_000_000));
        assert_eq!(schedule.get(DeductionCategory::Investments), Some(Decimal::from(150_000)));
    }

    #[test]
    fn test_fixed_deductions_independent_of_income() {
        for income in [0, 300_000, 5_000_000] {
            let schedule = identify_deductions(Decimal::from(income));
            assert_eq!(schedule.len(), 3);
            assert_eq!(schedule.get(DeductionCategory::HealthInsurance), Some(Decimal::from(25_000)));
            assert_eq!(
                schedule.get(DeductionCategory::HomeLoanInterest),
                Some(Decimal::from(200_000))
            );
        }
    }

    #[test]
    fn test_negative_income_propagates() {
        let schedule = identify_deductions(Decimal::from(-100_000));
        assert_eq!(schedule.get(DeductionCategory::Investments), Some(Decimal::from(-10_000)));
    }

    #[test]
    fn test_total_for_scenario_a() {
        assert_eq!(identify_deductions(Decimal::from(800_000)).total(), Decimal::from(305_000));
    }
}
