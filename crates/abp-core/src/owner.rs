//! Polymorphic ownership edges as tagged unions.
//!
//! The permission evaluator dispatches exhaustively on these, so adding an
//! owner kind is a compile error until every dispatch site handles it.

use serde::{Deserialize, Serialize};

use crate::id::{ActivityId, ContactId, FundId, MandateId};

/// Owner of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentOwner {
    Contact(ContactId),
    Mandate(MandateId),
    Fund(FundId),
    Activity(ActivityId),
}

/// Subject an activity is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActivitySubject {
    Contact(ContactId),
    Mandate(MandateId),
}

/// Owner of a postal address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AddressOwner {
    Contact(ContactId),
    Mandate(MandateId),
    Fund(FundId),
}

/// Owner of a bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum BankAccountOwner {
    Mandate(MandateId),
    Fund(FundId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_owner_serializes_tagged() {
        let id = MandateId::generate();
        let json = serde_json::to_value(DocumentOwner::Mandate(id)).expect("serialize owner");
        assert_eq!(json["kind"], "mandate");
        assert_eq!(json["id"], id.to_string());
    }
}
