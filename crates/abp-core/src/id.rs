//! Typed record identifiers.
//!
//! Every entity gets its own UUID newtype so ownership edges cannot be
//! crossed accidentally (a `ContactId` never unifies with a `MandateId`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::from_str(value)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Authenticating platform user.
    UserId
);
define_id!(
    /// Named role/mandate-group grant set.
    UserGroupId
);
define_id!(
    /// Family or organization scoping bucket for mandates.
    MandateGroupId
);
define_id!(
    /// Client engagement aggregate.
    MandateId
);
define_id!(
    /// Ownership edge between a mandate and a contact.
    MandateMemberId
);
define_id!(
    /// Person or organization record.
    ContactId
);
define_id!(
    /// Postal address owned by a contact, mandate, or fund.
    AddressId
);
define_id!(
    /// Phone/email/website detail of a contact.
    ContactDetailId
);
define_id!(
    /// Compliance profile of a contact (1:1).
    ComplianceDetailId
);
define_id!(
    /// Tax profile of a contact (1:1).
    TaxDetailId
);
define_id!(
    /// Typed edge between two contacts.
    ContactRelationshipId
);
define_id!(
    /// Investment fund.
    FundId
);
define_id!(
    /// Fund participant tied to a mandate.
    InvestorId
);
define_id!(
    /// Per-fund cashflow batch.
    FundCashflowId
);
define_id!(
    /// Single investor line item within a fund cashflow.
    InvestorCashflowId
);
define_id!(
    /// Published fund report.
    FundReportId
);
define_id!(
    /// Stored document with a polymorphic owner.
    DocumentId
);
define_id!(
    /// Assignable work item.
    TaskId
);
define_id!(
    /// Comment on a task.
    TaskCommentId
);
define_id!(
    /// Logged interaction (call, meeting, email, note).
    ActivityId
);
define_id!(
    /// Bank account owned by a mandate or fund.
    BankAccountId
);
define_id!(
    /// Curated contact list.
    ListId
);
define_id!(
    /// Newsletter double-opt-in subscriber.
    SubscriberId
);
define_id!(
    /// Append-only audit record.
    VersionId
);
