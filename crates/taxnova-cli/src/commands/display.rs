//! Terminal rendering shared by the subcommands and the chat session.

use console::Style;
use rust_decimal::Decimal;

use taxnova_core::form16::rules::format_inr_amount;
use taxnova_core::models::config::ResourceLink;
use taxnova_core::{
    ChatMessage, ExtractedFinancials, FilingReceipt, Role, TaxComputationResult, TaxDueStatus,
    Theme,
};

/// Styles for one theme.
pub struct Palette {
    pub heading: Style,
    pub user: Style,
    pub assistant: Style,
    pub accent: Style,
    pub muted: Style,
    pub ok: Style,
    pub warn: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                heading: Style::new().bold().blue(),
                user: Style::new().cyan(),
                assistant: Style::new(),
                accent: Style::new().magenta(),
                muted: Style::new().dim(),
                ok: Style::new().green(),
                warn: Style::new().yellow(),
            },
            Theme::Dark => Self {
                heading: Style::new().bold().cyan().bright(),
                user: Style::new().yellow().bright(),
                assistant: Style::new().white().bright(),
                accent: Style::new().magenta().bright(),
                muted: Style::new().white().dim(),
                ok: Style::new().green().bright(),
                warn: Style::new().yellow().bright(),
            },
        }
    }

    pub fn role(&self, role: Role) -> &Style {
        match role {
            Role::User => &self.user,
            _ => &self.assistant,
        }
    }
}

/// Rupee amount with the sign ahead of the symbol (-₹17,750.00).
pub fn rupees(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{sign}₹{}", format_inr_amount(amount.abs()))
}

pub fn financials_text(financials: &ExtractedFinancials, palette: &Palette) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", palette.heading.apply_to("Extracted Data from Form 16:")));
    output.push_str(&format!("  Gross Salary:    {}\n", rupees(financials.gross_salary)));
    output.push_str(&format!("  TDS Deducted:    {}\n", rupees(financials.tax_deducted_at_source)));
    output.push_str(&format!("  Taxable Income:  {}\n", rupees(financials.taxable_income)));
    output
}

/// One-line reading of tax due under the result's policy.
pub fn due_line(result: &TaxComputationResult) -> String {
    match result.status() {
        TaxDueStatus::Payable(amount) => format!("Remaining Tax Payable: {}", rupees(amount)),
        TaxDueStatus::Refund(amount) => format!("Refund Due: {}", rupees(amount)),
        TaxDueStatus::Settled => format!("Remaining Tax Payable: {}", rupees(Decimal::ZERO)),
    }
}

pub fn estimate_text(result: &TaxComputationResult, palette: &Palette) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", palette.heading.apply_to("Deductions Applied:")));
    for (category, amount) in result.deductions.iter() {
        output.push_str(&format!("  {:<34} {}\n", category.label(), rupees(amount)));
    }
    output.push_str(&format!("  {:<34} {}\n", "Total", rupees(result.total_deductions)));
    output.push('\n');
    output.push_str(&format!(
        "Taxable Income after Deductions: {}\n",
        rupees(result.taxable_income_after_deductions)
    ));
    output.push_str(&format!("Total Tax Liability: {}\n", rupees(result.tax_liability)));

    let line = due_line(result);
    let styled = match result.status() {
        TaxDueStatus::Payable(_) => palette.warn.apply_to(line),
        _ => palette.ok.apply_to(line),
    };
    output.push_str(&format!("{}\n", styled));
    output
}

pub fn receipt_text(receipt: &FilingReceipt, palette: &Palette) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{}\n",
        palette.warn.apply_to("SIMULATION: no return has been submitted to any tax authority.")
    ));
    output.push_str(&format!("{}\n", palette.heading.apply_to("ITR Filing Status:")));
    output.push_str(&format!("  Status:       {}\n", receipt.status));
    output.push_str(&format!("  Message:      {}\n", receipt.message));
    output.push_str(&format!("  Reference ID: {}\n", receipt.reference_id));
    output
}

pub fn resources_text(links: &[ResourceLink], palette: &Palette) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", palette.heading.apply_to("Tax Resources")));
    for link in links {
        output.push_str(&format!("  {}  {}\n", link.title, palette.accent.apply_to(&link.url)));
    }
    output
}

pub fn message_text(message: &ChatMessage, palette: &Palette) -> String {
    let speaker = match message.role {
        Role::User => "you",
        _ => "assistant",
    };
    format!(
        "{} {}",
        palette.muted.apply_to(format!("{speaker} ›")),
        palette.role(message.role).apply_to(&message.content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxnova_core::{estimate, TaxDuePolicy};

    fn financials(taxable_income: i64, tds: i64) -> ExtractedFinancials {
        ExtractedFinancials::new(Decimal::ZERO, Decimal::from(tds), Decimal::from(taxable_income))
    }

    #[test]
    fn test_due_line_per_policy() {
        let signed = estimate(&financials(800_000, 30_000), TaxDuePolicy::Signed);
        assert_eq!(due_line(&signed), "Refund Due: ₹17,750.00");

        let floored = estimate(&financials(800_000, 30_000), TaxDuePolicy::Floored);
        assert_eq!(due_line(&floored), "Remaining Tax Payable: ₹0.00");

        let payable = estimate(&financials(1_500_000, 50_000), TaxDuePolicy::Floored);
        assert_eq!(due_line(&payable), "Remaining Tax Payable: ₹1,00,000.00");
    }

    #[test]
    fn test_rupees_sign_before_symbol() {
        assert_eq!(rupees(Decimal::from(-17_750)), "-₹17,750.00");
        assert_eq!(rupees(Decimal::from(1_234_567)), "₹12,34,567.00");
        assert_eq!(rupees(Decimal::ZERO), "₹0.00");
    }

    #[test]
    fn test_receipt_is_labelled_as_simulation() {
        console::set_colors_enabled(false);
        let receipt = FilingReceipt {
            status: "Success".to_string(),
            message: "Your ITR has been successfully filed!".to_string(),
            reference_id: "ITR123456789".to_string(),
            simulated: true,
        };
        let text = receipt_text(&receipt, &Palette::for_theme(Theme::Light));
        assert!(text.starts_with("SIMULATION"));
        assert!(text.contains("ITR123456789"));
    }
}
