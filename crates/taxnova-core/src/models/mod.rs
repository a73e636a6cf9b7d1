//! Data models shared by the extraction, tax and chat layers.

pub mod chat;
pub mod config;
pub mod financials;
pub mod tax;
