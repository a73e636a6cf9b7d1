//! Error types for the taxnova-core library.
//!
//! Field extraction and the filing stub have no error path; everything that
//! touches a document, the chat service or the filesystem does.

use thiserror::Error;

/// Main error type for the taxnova library.
#[derive(Error, Debug)]
pub enum TaxnovaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Chat service error.
    #[error("chat error: {0}")]
    Chat(#[from] ChatError),

    /// Transcript export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration or secrets error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while talking to the chat-completion service.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Transport failure (connect, TLS, body read).
    #[error("request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A streamed event could not be decoded.
    #[error("malformed stream event: {0}")]
    Decode(String),

    /// The service reported an error inside the stream.
    #[error("service error: {0}")]
    Service(String),
}

/// Errors related to transcript export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// PDF rendering failed.
    #[error("failed to render PDF: {0}")]
    Render(String),

    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration and secrets.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key in the env file or the process environment.
    #[error("missing API key: set {0} in the env file or the environment")]
    MissingApiKey(String),

    /// The env file exists but could not be read.
    #[error("failed to read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for the taxnova library.
pub type Result<T> = std::result::Result<T, TaxnovaError>;
