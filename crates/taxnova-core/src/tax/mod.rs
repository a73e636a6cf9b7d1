//! Deduction schedule and progressive tax estimation.

mod brackets;
mod deductions;
mod estimator;

pub use brackets::{tax_liability, TaxBracket, BRACKETS};
pub use deductions::{
    identify_deductions, HEALTH_INSURANCE_DEDUCTION, HOME_LOAN_INTEREST_DEDUCTION,
    INVESTMENT_CAP, INVESTMENT_RATE,
};
pub use estimator::{estimate, TaxEstimator};
