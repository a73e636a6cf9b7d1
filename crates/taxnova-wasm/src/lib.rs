//! WASM bindings for the TaxNova assistant.
//!
//! Exposes Form 16 extraction, tax estimation, the simulated filer and a
//! browser-side chat session. Talking to the chat service is left to the host
//! page; amounts cross the boundary as `f64`.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use taxnova_core::form16::rules::format_inr_amount;
use taxnova_core::models::config::FilingConfig;
use taxnova_core::{
    ChatSession, ExtractedFinancials, PdfExtractor, SimulatedFiler, TaxDuePolicy, TaxEstimator,
    UploadAnalysis,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn decimal(value: f64) -> Result<Decimal, JsValue> {
    Decimal::from_f64(value).ok_or_else(|| JsValue::from_str(&format!("not a finite amount: {value}")))
}

fn policy(signed: bool) -> TaxDuePolicy {
    if signed {
        TaxDuePolicy::Signed
    } else {
        TaxDuePolicy::Floored
    }
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Extract gross salary, TDS and taxable income from certificate text.
#[wasm_bindgen]
pub fn extract_financials(text: &str) -> Result<JsValue, JsValue> {
    to_js(&taxnova_core::extract_financials(text))
}

/// Extract figures from the bytes of a Form 16 PDF.
#[wasm_bindgen]
pub fn extract_financials_from_pdf(data: &[u8]) -> Result<JsValue, JsValue> {
    to_js(&read_pdf(data)?)
}

fn read_pdf(data: &[u8]) -> Result<ExtractedFinancials, JsValue> {
    let content = PdfExtractor::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if content.is_empty() {
        web_sys::console::warn_1(&"No text found in PDF; all figures default to 0".into());
    }
    Ok(taxnova_core::extract_financials(&content.text))
}

/// Deductions applicable to a taxable income, keyed by category.
#[wasm_bindgen]
pub fn identify_deductions(taxable_income: f64) -> Result<JsValue, JsValue> {
    to_js(&taxnova_core::identify_deductions(decimal(taxable_income)?))
}

/// Liability under the progressive brackets.
#[wasm_bindgen]
pub fn tax_liability(income: f64) -> Result<f64, JsValue> {
    Ok(taxnova_core::tax_liability(decimal(income)?).to_f64().unwrap_or(0.0))
}

/// Full estimate; `signed` reports refunds as negative tax due.
#[wasm_bindgen]
pub fn estimate_tax(taxable_income: f64, tds: f64, signed: bool) -> Result<JsValue, JsValue> {
    let result = TaxEstimator::new()
        .with_policy(policy(signed))
        .estimate_income(decimal(taxable_income)?, decimal(tds)?);
    to_js(&result)
}

/// Filing settings from a JS object; `undefined` or `null` means defaults.
fn filing_config(value: JsValue) -> Result<FilingConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(FilingConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Simulated filing. The receipt's `simulated` flag is always true.
///
/// `filing` takes the same optional settings object as `BrowserSession`.
#[wasm_bindgen]
pub fn file_return(taxable_income: f64, tds: f64, filing: JsValue) -> Result<JsValue, JsValue> {
    let financials = ExtractedFinancials::new(Decimal::ZERO, decimal(tds)?, decimal(taxable_income)?);
    to_js(&SimulatedFiler::new(filing_config(filing)?).file_at(&financials, now()))
}

/// Format an amount with Indian digit grouping (12,34,567.89).
#[wasm_bindgen]
pub fn format_inr(amount: f64) -> Result<String, JsValue> {
    let value = decimal(amount)?;
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    Ok(format!("{sign}₹{}", format_inr_amount(value.abs())))
}

/// Per-tab session state: chat history and theme, the latest upload and
/// the filing settings.
#[wasm_bindgen]
pub struct BrowserSession {
    chat: ChatSession,
    policy: TaxDuePolicy,
    filer: SimulatedFiler,
}

#[wasm_bindgen]
impl BrowserSession {
    /// Start a session whose history holds only the greeting.
    ///
    /// `filing` is an optional object with the filing settings
    /// (`reference`, `status`, `message`); missing keys use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(system_context: &str, greeting: &str, filing: JsValue) -> Result<BrowserSession, JsValue> {
        Ok(Self {
            chat: ChatSession::new(system_context, greeting),
            policy: TaxDuePolicy::default(),
            filer: SimulatedFiler::new(filing_config(filing)?),
        })
    }

    #[wasm_bindgen]
    pub fn set_signed_policy(&mut self, signed: bool) {
        self.policy = policy(signed);
    }

    /// Read a certificate, estimate tax and keep both on the session.
    #[wasm_bindgen]
    pub fn upload_pdf(&mut self, data: &[u8]) -> Result<JsValue, JsValue> {
        let financials = read_pdf(data)?;
        self.record(financials)
    }

    /// Same as `upload_pdf` for already-extracted text.
    #[wasm_bindgen]
    pub fn upload_text(&mut self, text: &str) -> Result<JsValue, JsValue> {
        self.record(taxnova_core::extract_financials(text))
    }

    fn record(&mut self, financials: ExtractedFinancials) -> Result<JsValue, JsValue> {
        let computation = TaxEstimator::new().with_policy(self.policy).estimate(&financials);
        let value = to_js(&computation)?;
        self.chat.record_upload(UploadAnalysis {
            financials,
            computation,
        });
        Ok(value)
    }

    /// Figures and estimate from the latest upload, or `undefined`.
    #[wasm_bindgen]
    pub fn analysis(&self) -> Result<JsValue, JsValue> {
        to_js(&self.chat.analysis())
    }

    /// File using the latest upload.
    #[wasm_bindgen]
    pub fn file_return(&self) -> Result<JsValue, JsValue> {
        let analysis = self
            .chat
            .analysis()
            .ok_or_else(|| JsValue::from_str("Upload a Form 16 first"))?;
        to_js(&self.filer.file_at(&analysis.financials, now()))
    }

    #[wasm_bindgen]
    pub fn push_user(&mut self, content: &str) {
        self.chat.push_user(content);
    }

    #[wasm_bindgen]
    pub fn push_assistant(&mut self, content: &str) {
        self.chat.push_assistant(content);
    }

    /// Request messages for the chat service: system context, greeting, then history.
    #[wasm_bindgen]
    pub fn request_messages(&self) -> Result<JsValue, JsValue> {
        to_js(&self.chat.request_messages())
    }

    #[wasm_bindgen]
    pub fn history(&self) -> Result<JsValue, JsValue> {
        to_js(&self.chat.history())
    }

    #[wasm_bindgen]
    pub fn transcript(&self) -> String {
        self.chat.transcript()
    }

    #[wasm_bindgen]
    pub fn theme(&self) -> String {
        self.chat.theme().to_string()
    }

    /// Flip between light and dark; returns the new theme name.
    #[wasm_bindgen]
    pub fn toggle_theme(&mut self) -> String {
        self.chat.toggle_theme().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxnova_core::models::config::ReferenceMode;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_tax_liability() {
        assert_eq!(tax_liability(495_000.0).unwrap(), 12_250.0);
        assert_eq!(tax_liability(0.0).unwrap(), 0.0);
    }

    #[wasm_bindgen_test]
    fn test_format_inr() {
        assert_eq!(format_inr(1_234_567.891).unwrap(), "₹12,34,567.89");
        assert_eq!(format_inr(-17_750.0).unwrap(), "-₹17,750.00");
        assert_eq!(format_inr(0.0).unwrap(), "₹0.00");
    }

    #[wasm_bindgen_test]
    fn test_session_history_and_theme() {
        let mut session = BrowserSession::new("ctx", "Hello!", JsValue::UNDEFINED).unwrap();
        session.push_user("What is 80C?");
        session.push_assistant("Investments up to 1.5 lakh.");

        assert_eq!(
            session.transcript(),
            "Assistant: Hello!\nUser: What is 80C?\nAssistant: Investments up to 1.5 lakh."
        );
        assert_eq!(session.chat.request_messages().len(), 5);
        assert_eq!(session.theme(), "light");
        assert_eq!(session.toggle_theme(), "dark");
    }

    #[wasm_bindgen_test]
    fn test_session_upload_text() {
        let mut session = BrowserSession::new("ctx", "Hello!", JsValue::NULL).unwrap();
        assert!(session.file_return().is_err());

        session
            .upload_text("Gross Salary: 9,50,000\nTax Deducted at Source: 30,000\nTaxable Income: 8,00,000")
            .unwrap();

        let analysis = session.chat.analysis().unwrap();
        assert_eq!(analysis.computation.tax_liability, Decimal::from(12_250));
        assert_eq!(analysis.computation.tax_due, Decimal::ZERO);
        assert!(session.file_return().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_filing_settings_are_injected() {
        let settings = FilingConfig {
            reference: ReferenceMode::Constant {
                id: "DEMO-0001".to_string(),
            },
            status: "Accepted".to_string(),
            ..FilingConfig::default()
        };
        let mut session =
            BrowserSession::new("ctx", "Hello!", serde_wasm_bindgen::to_value(&settings).unwrap()).unwrap();
        session.upload_text("Taxable Income: 8,00,000").unwrap();

        let analysis = session.chat.analysis().unwrap();
        let receipt = session.filer.file_at(&analysis.financials, now());
        assert_eq!(receipt.reference_id, "DEMO-0001");
        assert_eq!(receipt.status, "Accepted");
        assert!(receipt.simulated);
    }

    #[wasm_bindgen_test]
    fn test_malformed_filing_settings_are_rejected() {
        let result = BrowserSession::new("ctx", "Hello!", JsValue::from_str("not an object"));
        assert!(result.is_err());
    }
}
