//! Regex patterns for Form 16 field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Number with optional Western (1,234,567) or Indian (12,34,567) digit
/// grouping and up to two decimals.
pub const AMOUNT: &str = r"([0-9]+(?:,[0-9]{2,3})*(?:\.[0-9]{1,2})?)";

/// Label followed, on the same line, by the first number after it.
fn labeled(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){}.*?{}", label, AMOUNT)).unwrap()
}

lazy_static! {
    pub static ref GROSS_SALARY: Regex = labeled(r"gross\s+salary");

    pub static ref TAX_DEDUCTED_AT_SOURCE: Regex = labeled(r"tax\s+deducted\s+at\s+source");

    pub static ref TAXABLE_INCOME: Regex = labeled(r"taxable\s+income");
}
