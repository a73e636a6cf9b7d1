//! Amount extraction and formatting for rupee figures.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::{ExtractionMatch, FieldExtractor, Form16Field};

/// Extracts the first number that follows a field label on the same line.
pub struct LabeledAmountExtractor {
    field: Form16Field,
}

impl LabeledAmountExtractor {
    pub fn new(field: Form16Field) -> Self {
        Self { field }
    }

    pub fn field(&self) -> Form16Field {
        self.field
    }
}

impl FieldExtractor for LabeledAmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in self.field.pattern().captures_iter(text) {
            let (Some(full_match), Some(amount)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if let Some(value) = parse_inr_amount(amount.as_str()) {
                results.push(
                    ExtractionMatch::new(value, full_match.as_str())
                        .with_position(amount.start(), amount.end()),
                );
            }
        }

        results
    }
}

/// Parse a rupee amount with any comma grouping (e.g. "12,34,567.89").
pub fn parse_inr_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with Indian digit grouping and two decimals (12,34,567.89).
pub fn format_inr_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs().round_dp(2));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let grouped = if integer_part.len() <= 3 {
        integer_part.to_string()
    } else {
        let (head, tail) = integer_part.split_at(integer_part.len() - 3);
        let chars: Vec<char> = head.chars().collect();
        let mut formatted = String::new();
        for (i, c) in chars.iter().enumerate() {
            if i > 0 && (chars.len() - i) % 2 == 0 {
                formatted.push(',');
            }
            formatted.push(*c);
        }
        format!("{},{}", formatted, tail)
    };

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, decimal_part)
}
