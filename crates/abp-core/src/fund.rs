//! Funds, investors, and cashflows.
//!
//! An investor joins a fund through a mandate and must be signed (investment
//! date plus subscription-agreement document) before any cashflow may
//! reference it. Fund cashflows are batches; investor cashflows are the
//! per-investor line items and must stay on the same fund as their batch.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::{
    DocumentId, FundCashflowId, FundId, FundReportId, InvestorCashflowId, InvestorId, MandateId,
};
use crate::lifecycle::{CashflowState, FundState, InvestorState};

// ─────────────────────────────────────────────────────────────────────────────
// Fund
// ─────────────────────────────────────────────────────────────────────────────

/// Investment fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    pub id: FundId,
    pub name: String,
    pub state: FundState,
    /// ISO 4217 code.
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inception_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_register_number: Option<String>,
    /// Currently designated legal address, maintained by the store's
    /// designation swap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<crate::id::AddressId>,
}

impl Fund {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "blank", "must be present");
        }
        if self.currency.len() != 3 {
            errors.add("currency", "invalid", "is not an ISO 4217 code");
        }
        errors
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Investor
// ─────────────────────────────────────────────────────────────────────────────

/// Fund participant tied to a mandate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    pub id: InvestorId,
    pub fund_id: FundId,
    pub mandate_id: MandateId,
    pub state: InvestorState,
    /// Committed capital in the fund currency.
    pub amount_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_date: Option<NaiveDate>,
    /// Signed subscription agreement backing the `signed` state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_subscription_agreement: Option<DocumentId>,
}

impl Investor {
    /// Cross-field invariant: the signed state requires an investment date
    /// and an attached subscription agreement.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.amount_total < Decimal::ZERO {
            errors.add("amount_total", "negative", "must not be negative");
        }
        if self.state == InvestorState::Signed {
            if self.investment_date.is_none() {
                errors.add("investment_date", "blank", "must be present for signed investors");
            }
            if self.fund_subscription_agreement.is_none() {
                errors.add(
                    "fund_subscription_agreement",
                    "blank",
                    "must be present for signed investors",
                );
            }
        }
        errors
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self.state, InvestorState::Signed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cashflows
// ─────────────────────────────────────────────────────────────────────────────

/// Per-fund cashflow batch aggregating investor line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundCashflow {
    pub id: FundCashflowId,
    pub fund_id: FundId,
    /// Sequential number within the fund.
    pub number: u32,
    pub valuta_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Single investor line item within a fund cashflow.
///
/// Positive `distribution_amount` pays out, positive `capital_call_amount`
/// draws in; `net_amount` is distribution minus call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorCashflow {
    pub id: InvestorCashflowId,
    pub fund_cashflow_id: FundCashflowId,
    pub investor_id: InvestorId,
    pub state: CashflowState,
    pub capital_call_amount: Decimal,
    pub distribution_amount: Decimal,
}

impl InvestorCashflow {
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.distribution_amount - self.capital_call_amount
    }

    /// Pre-conditions against the referenced investor and batch: the
    /// investor must already be signed and must belong to the batch's fund.
    #[must_use]
    pub fn validate(&self, investor: &Investor, batch: &FundCashflow) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.capital_call_amount < Decimal::ZERO {
            errors.add("capital_call_amount", "negative", "must not be negative");
        }
        if self.distribution_amount < Decimal::ZERO {
            errors.add("distribution_amount", "negative", "must not be negative");
        }
        if !investor.is_signed() {
            errors.add("investor_id", "not_signed", "investor must be signed");
        }
        if investor.fund_id != batch.fund_id {
            errors.add("investor_id", "fund_mismatch", "investor belongs to a different fund");
        }
        errors
    }
}

/// Aggregate totals over a batch's line items, recomputed whenever a line
/// item changes inside the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashflowTotals {
    pub capital_call_total: Decimal,
    pub distribution_total: Decimal,
    pub net_total: Decimal,
}

impl CashflowTotals {
    /// Sum the line items of one batch.
    pub fn of<'a>(items: impl IntoIterator<Item = &'a InvestorCashflow>) -> Self {
        let mut totals = Self::default();
        for item in items {
            totals.capital_call_total += item.capital_call_amount;
            totals.distribution_total += item.distribution_amount;
            totals.net_total += item.net_amount();
        }
        totals
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of a published fund report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundReportKind {
    Quarterly,
    Annual,
    CapitalAccountStatement,
}

/// Published fund report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundReport {
    pub id: FundReportId,
    pub fund_id: FundId,
    pub title: String,
    pub kind: FundReportKind,
    pub valuta_date: NaiveDate,
}

impl FundReport {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.title.trim().is_empty() {
            errors.add("title", "blank", "must be present");
        }
        errors
    }
}
