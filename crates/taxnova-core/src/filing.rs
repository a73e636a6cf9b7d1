//! Simulated return filing.
//!
//! Nothing here contacts a tax authority. Every receipt is marked
//! `simulated` and front ends must present it as such.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::config::{FilingConfig, ReferenceMode};
use crate::models::financials::ExtractedFinancials;

/// Confirmation returned by a filer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingReceipt {
    pub status: String,
    pub message: String,
    pub reference_id: String,
    /// Always true for `SimulatedFiler`.
    pub simulated: bool,
}

/// Something that can file a return for extracted figures.
pub trait ReturnFiler {
    fn file(&self, financials: &ExtractedFinancials) -> FilingReceipt;
}

/// Filer that always succeeds without any I/O.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFiler {
    config: FilingConfig,
}

impl SimulatedFiler {
    pub fn new(config: FilingConfig) -> Self {
        Self { config }
    }

    fn reference_id(&self, now: DateTime<Utc>) -> String {
        match &self.config.reference {
            ReferenceMode::Constant { id } => id.clone(),
            ReferenceMode::Timestamp { prefix } => {
                format!("{}{}", prefix, now.format("%Y%m%d%H%M%S"))
            }
        }
    }

    /// File at a given instant; `file` uses the current time.
    pub fn file_at(&self, _financials: &ExtractedFinancials, now: DateTime<Utc>) -> FilingReceipt {
        let receipt = FilingReceipt {
            status: self.config.status.clone(),
            message: self.config.message.clone(),
            reference_id: self.reference_id(now),
            simulated: true,
        };
        info!("Simulated filing, reference {}", receipt.reference_id);
        receipt
    }
}

impl ReturnFiler for SimulatedFiler {
    fn file(&self, financials: &ExtractedFinancials) -> FilingReceipt {
        self.file_at(financials, Utc::now())
    }
}
