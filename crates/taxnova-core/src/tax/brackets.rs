//! Four-bracket progressive liability formula.

use rust_decimal::Decimal;

/// One progressive tier: `base + (x - lower) * rate` for `lower < x <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBracket {
    pub lower: Decimal,
    /// Inclusive upper bound; `None` for the top bracket.
    pub upper: Option<Decimal>,
    /// Liability accumulated by all lower brackets.
    pub base: Decimal,
    pub rate: Decimal,
}

const fn amount(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 0)
}

const fn percent(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 2)
}

/// Annual brackets on taxable income after deductions.
pub const BRACKETS: [TaxBracket; 4] = [
    TaxBracket {
        lower: amount(0),
        upper: Some(amount(250_000)),
        base: amount(0),
        rate: percent(0),
    },
    TaxBracket {
        lower: amount(250_000),
        upper: Some(amount(500_000)),
        base: amount(0),
        rate: percent(5),
    },
    TaxBracket {
        lower: amount(500_000),
        upper: Some(amount(1_000_000)),
        base: amount(12_500),
        rate: percent(20),
    },
    TaxBracket {
        lower: amount(1_000_000),
        upper: None,
        base: amount(112_500),
        rate: percent(30),
    },
];

impl TaxBracket {
    pub fn contains(&self, income: Decimal) -> bool {
        self.upper.is_none_or(|upper| income <= upper)
    }

    pub fn liability(&self, income: Decimal) -> Decimal {
        self.base + (income - self.lower) * self.rate
    }
}

/// Liability for taxable income after deductions.
pub fn tax_liability(income: Decimal) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    BRACKETS
        .iter()
        .find(|b| b.contains(income))
        .unwrap_or(&BRACKETS[BRACKETS.len() - 1])
        .liability(income)
}
