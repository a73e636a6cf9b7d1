//! Core library for the TaxNova tax assistant.
//!
//! This crate provides:
//! - PDF text extraction for salary tax certificates (Form 16)
//! - Rule-based extraction of gross salary, TDS and taxable income
//! - Deduction schedule and progressive tax-bracket estimation
//! - A simulated (non-functional) return filing stub
//! - Per-session chat state
//! - Streaming chat-completion client (native)
//! - Chat transcript export to PDF (native)

pub mod error;
pub mod models;
pub mod pdf;
pub mod form16;
pub mod tax;
pub mod filing;
pub mod session;
#[cfg(feature = "native")]
pub mod chat;
#[cfg(feature = "native")]
pub mod export;

pub use error::{TaxnovaError, Result};
pub use models::financials::ExtractedFinancials;
pub use models::tax::{
    DeductionCategory, DeductionSchedule, TaxComputationResult, TaxDuePolicy, TaxDueStatus,
};
pub use models::chat::{ChatMessage, Role, Theme};
pub use models::config::TaxnovaConfig;
pub use pdf::{PdfExtractor, PdfContent, PdfProcessor};
pub use form16::{extract_financials, ExtractionResult, Form16Parser};
pub use tax::{estimate, identify_deductions, tax_liability, TaxEstimator};
pub use filing::{FilingReceipt, ReturnFiler, SimulatedFiler};
pub use session::{ChatSession, UploadAnalysis};
#[cfg(feature = "native")]
pub use chat::{ChatClient, CompletionSource, Secrets};
