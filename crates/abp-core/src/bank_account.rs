//! Bank accounts owned by mandates or funds.

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::BankAccountId;
use crate::owner::BankAccountOwner;

/// Bank account. Identified either by the SEPA pair (IBAN, BIC) or by the
/// domestic pair (account number, routing number); exactly one pair must be
/// fully present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: BankAccountId,
    pub owner: BankAccountOwner,
    pub bank_name: String,
    /// ISO 4217 code.
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    /// Account used for alternative-investment capital calls.
    #[serde(default)]
    pub alternative_investments: bool,
}

impl BankAccount {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.bank_name.trim().is_empty() {
            errors.add("bank_name", "blank", "must be present");
        }
        if self.currency.len() != 3 {
            errors.add("currency", "invalid", "is not an ISO 4217 code");
        }

        let sepa = self.iban.is_some() || self.bic.is_some();
        let domestic = self.account_number.is_some() || self.routing_number.is_some();
        match (sepa, domestic) {
            (true, true) => {
                errors.add("iban", "mutually_exclusive", "cannot combine IBAN/BIC with account/routing number");
            }
            (false, false) => {
                errors.add("iban", "blank", "either IBAN/BIC or account/routing number must be present");
            }
            (true, false) => {
                if self.iban.is_none() {
                    errors.add("iban", "blank", "must be present with BIC");
                }
                if self.bic.is_none() {
                    errors.add("bic", "blank", "must be present with IBAN");
                }
            }
            (false, true) => {
                if self.account_number.is_none() {
                    errors.add("account_number", "blank", "must be present with routing number");
                }
                if self.routing_number.is_none() {
                    errors.add("routing_number", "blank", "must be present with account number");
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::id::MandateId;

    fn account() -> BankAccount {
        BankAccount {
            id: BankAccountId::generate(),
            owner: BankAccountOwner::Mandate(MandateId::generate()),
            bank_name: "Bankhaus Nord".to_string(),
            currency: "EUR".to_string(),
            iban: Some("DE02120300000000202051".to_string()),
            bic: Some("BYLADEM1001".to_string()),
            account_number: None,
            routing_number: None,
            alternative_investments: false,
        }
    }

    #[test]
    fn complete_sepa_pair_is_valid() {
        assert!(account().validate().is_empty());
    }

    #[test]
    fn complete_domestic_pair_is_valid() {
        let mut subject = account();
        subject.iban = None;
        subject.bic = None;
        subject.account_number = Some("000123456".to_string());
        subject.routing_number = Some("021000021".to_string());
        assert!(subject.validate().is_empty());
    }

    #[test]
    fn mixing_both_pairs_is_rejected() {
        let mut subject = account();
        subject.account_number = Some("000123456".to_string());
        assert_eq!(subject.validate().errors()[0].code, "mutually_exclusive");
    }

    #[test]
    fn missing_both_pairs_is_rejected() {
        let mut subject = account();
        subject.iban = None;
        subject.bic = None;
        assert_eq!(subject.validate().errors()[0].code, "blank");
    }

    #[test]
    fn half_pairs_name_the_missing_field() {
        let mut subject = account();
        subject.bic = None;
        let errors = subject.validate();
        assert_eq!(errors.errors()[0].field, "bic");

        let mut subject = account();
        subject.iban = None;
        subject.bic = None;
        subject.routing_number = Some("021000021".to_string());
        let errors = subject.validate();
        assert_eq!(errors.errors()[0].field, "account_number");
    }
}
