//! Paid commission flow.
//!
//! A buyer describes the artwork they want, picks a tier and pays through
//! their own wallet. Signing happens behind [`PaymentSender`]; once the
//! payment is confirmed the commission is written to the realtime store so
//! the studio picks it up. That write is bookkeeping only: the confirmed
//! payment is what makes the commission succeed.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::error::{AtelierError, Result};
use crate::event::firebase::record_url;

/// Wallet that receives commission payments
pub const TREASURY: &str = "0x55A4Da52B693DFB5A89A812cD56fd768828860A5";

/// Record under which pending commissions are queued
pub const PENDING_RECORD: &str = "commissions/pending";

const EMPTY_PROMPT: &str = "Please describe your dream NFT.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub id: &'static str,
    pub label: &'static str,
    /// Price in ETH as shown to the buyer
    pub price: &'static str,
    pub price_eth: f64,
    pub perks: &'static [&'static str],
}

pub const TIERS: [Tier; 2] = [
    Tier {
        id: "budget",
        label: "Budget Commission",
        price: "0.006",
        price_eth: 0.006,
        perks: &[
            "Fast creation (24-48 hrs)",
            "AI-generated 1/1 artwork",
            "Minted to your wallet",
            "Certificate of authenticity",
        ],
    },
    Tier {
        id: "standard",
        label: "Standard Commission",
        price: "0.009",
        price_eth: 0.009,
        perks: &[
            "Priority creation (6-12 hrs)",
            "Exclusive high-res 1/1",
            "Full creation process video",
            "Minted + all agent files",
            "Direct atelier contact",
        ],
    },
];

pub const DEFAULT_TIER: &str = "standard";

pub fn find_tier(id: &str) -> Option<&'static Tier> {
    TIERS.iter().find(|t| t.id == id)
}

/// Why a payment did not go through
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PaymentError(pub String);

/// External wallet-signing seam; resolves to the transaction hash
pub trait PaymentSender {
    fn send_payment(
        &self,
        to: &str,
        tier: &Tier,
    ) -> impl Future<Output = std::result::Result<String, PaymentError>> + Send;
}

/// Destination of commission bookkeeping records
pub trait CommissionStore {
    fn record(&self, record: &CommissionRecord) -> impl Future<Output = Result<()>> + Send;
}

/// Commission as queued for the studio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRecord {
    pub prompt: String,
    pub buyer_address: String,
    pub tier: String,
    pub amount_paid: f64,
    pub tx_hash: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommissionStep {
    Form,
    Confirming,
    Success { tx_hash: String },
}

#[derive(Debug, Clone)]
pub struct CommissionFlow {
    prompt: String,
    tier: &'static Tier,
    step: CommissionStep,
    error: Option<String>,
}

impl CommissionFlow {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            tier: &TIERS[1],
            step: CommissionStep::Form,
            error: None,
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn select_tier(&mut self, id: &str) -> Result<()> {
        self.tier = find_tier(id)
            .ok_or_else(|| AtelierError::InvalidInput(format!("unknown tier {}", id)))?;
        Ok(())
    }

    pub fn tier(&self) -> &'static Tier {
        self.tier
    }

    pub fn step(&self) -> &CommissionStep {
        &self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pay and queue the commission.
    ///
    /// Validation and payment failures leave the flow in `Form` with an
    /// error; a failed bookkeeping write is only logged.
    pub async fn submit<P, S>(&mut self, buyer: &str, payer: &P, store: &S) -> &CommissionStep
    where
        P: PaymentSender,
        S: CommissionStore,
    {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            self.error = Some(EMPTY_PROMPT.to_string());
            self.step = CommissionStep::Form;
            return &self.step;
        }

        self.error = None;
        self.step = CommissionStep::Confirming;

        let tx_hash = match payer.send_payment(TREASURY, self.tier).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(tier = self.tier.id, error = %e, "commission payment rejected");
                self.error = Some(e.to_string());
                self.step = CommissionStep::Form;
                return &self.step;
            }
        };

        let record = CommissionRecord {
            prompt,
            buyer_address: buyer.to_string(),
            tier: self.tier.id.to_string(),
            amount_paid: self.tier.price_eth,
            tx_hash: tx_hash.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            status: "queued".to_string(),
        };
        if let Err(e) = store.record(&record).await {
            tracing::error!(%tx_hash, error = %e, "commission bookkeeping write failed");
        }

        tracing::info!(%tx_hash, tier = self.tier.id, "commission queued");
        self.step = CommissionStep::Success { tx_hash };
        &self.step
    }
}

impl Default for CommissionFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Payment already signed in the buyer's own wallet; carries its hash
#[derive(Debug, Clone)]
pub struct PresignedPayment {
    pub tx_hash: String,
}

impl PaymentSender for PresignedPayment {
    async fn send_payment(&self, _to: &str, _tier: &Tier) -> std::result::Result<String, PaymentError> {
        let hex = self.tx_hash.strip_prefix("0x").unwrap_or("");
        if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(self.tx_hash.clone())
        } else {
            Err(PaymentError(
                "Transaction hash must be 0x followed by 64 hex digits.".to_string(),
            ))
        }
    }
}

/// Writes commissions to the realtime store over its REST interface
#[derive(Debug, Clone)]
pub struct FirebaseCommissionStore {
    client: reqwest::Client,
    url: String,
}

impl FirebaseCommissionStore {
    pub fn new(client: reqwest::Client, database_url: &str) -> Self {
        Self {
            client,
            url: record_url(database_url, PENDING_RECORD),
        }
    }
}

impl CommissionStore for FirebaseCommissionStore {
    async fn record(&self, record: &CommissionRecord) -> Result<()> {
        self.client
            .post(&self.url)
            .json(record)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
