//! Fixture builders for platform tests.
//!
//! Seeds a [`Database`] directly, bypassing the operations layer, so tests
//! can arrange exactly the state they need and then exercise one operation.

use std::collections::BTreeSet;

use abp_core::{
    Contact, ContactId, ContactKind, Document, DocumentCategory, DocumentId, DocumentOwner, Fund,
    FundId, FundState, Gender, Investor, InvestorId, InvestorState, Mandate, MandateGroup,
    MandateGroupId, MandateGroupKind, MandateId, MandateState, OrganizationDetails, PersonDetails,
    Role, User, UserGroup, UserGroupId, UserId,
};
use abp_store::Database;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

/// Mutable database fixture.
#[derive(Debug, Default)]
pub struct Fixture {
    pub db: Database,
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user.
    pub fn user(&mut self, email: &str) -> UserId {
        let id = UserId::generate();
        self.db.users.insert(
            id,
            User {
                id,
                email: email.to_string(),
                contact_id: None,
                deactivated: false,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Seed a user group granting `roles` scoped to `mandate_groups`.
    pub fn user_group(
        &mut self,
        member: UserId,
        roles: &[Role],
        mandate_groups: &[MandateGroupId],
    ) -> UserGroupId {
        let id = UserGroupId::generate();
        self.db.user_groups.insert(
            id,
            UserGroup {
                id,
                name: format!("group-{id}"),
                roles: roles.iter().copied().collect(),
                mandate_groups: mandate_groups.iter().copied().collect(),
                members: BTreeSet::from([member]),
                comment: None,
            },
        );
        id
    }

    /// Seed a mandate group.
    pub fn mandate_group(&mut self, name: &str, kind: MandateGroupKind) -> MandateGroupId {
        let id = MandateGroupId::generate();
        self.db.mandate_groups.insert(
            id,
            MandateGroup {
                id,
                name: name.to_string(),
                kind,
                comment: None,
            },
        );
        id
    }

    /// Seed a prospect mandate inside `groups` with both consultants set.
    pub fn mandate(&mut self, title: &str, groups: &[MandateGroupId]) -> MandateId {
        let id = MandateId::generate();
        let primary = self.person("Petra", "Prime");
        let secondary = self.person("Sven", "Second");
        self.db.mandates.insert(
            id,
            Mandate {
                id,
                title: title.to_string(),
                state: MandateState::Prospect,
                category: None,
                primary_consultant: Some(primary),
                secondary_consultant: Some(secondary),
                assistant: None,
                bookkeeper: None,
                valid_from: None,
                valid_to: None,
                legal_address: None,
                groups: groups.iter().copied().collect(),
            },
        );
        id
    }

    /// Seed a person contact.
    pub fn person(&mut self, first: &str, last: &str) -> ContactId {
        let id = ContactId::generate();
        self.db.contacts.insert(
            id,
            Contact {
                id,
                kind: ContactKind::Person(PersonDetails {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    gender: Gender::Diverse,
                    date_of_birth: None,
                    date_of_death: None,
                    nationality: None,
                    profession: None,
                    health_insurance_private: false,
                    care_insurance: false,
                }),
                legal_address: None,
                primary_contact_address: None,
                comment: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        id
    }

    /// Seed an organization contact.
    pub fn organization(&mut self, name: &str) -> ContactId {
        let id = ContactId::generate();
        self.db.contacts.insert(
            id,
            Contact {
                id,
                kind: ContactKind::Organization(OrganizationDetails {
                    name: name.to_string(),
                    organization_category: None,
                    commercial_register_number: None,
                    vat_number: None,
                    lei: None,
                }),
                legal_address: None,
                primary_contact_address: None,
                comment: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        id
    }

    /// Seed an open fund.
    pub fn fund(&mut self, name: &str) -> FundId {
        let id = FundId::generate();
        self.db.funds.insert(
            id,
            Fund {
                id,
                name: name.to_string(),
                state: FundState::Open,
                currency: "EUR".to_string(),
                strategy: None,
                inception_year: Some(2022),
                commercial_register_number: None,
                legal_address: None,
            },
        );
        id
    }

    /// Seed a fund-owned subscription agreement document.
    pub fn subscription_agreement(&mut self, fund: FundId) -> DocumentId {
        let id = DocumentId::generate();
        self.db.documents.insert(
            id,
            Document {
                id,
                owner: DocumentOwner::Fund(fund),
                name: "subscription-agreement.pdf".to_string(),
                category: DocumentCategory::FundSubscriptionAgreement,
                uploaded_at: Utc::now(),
                valid_from: None,
                valid_to: None,
            },
        );
        id
    }

    /// Seed an investor in the given state. Signed investors get an
    /// investment date and an agreement document.
    pub fn investor(&mut self, fund: FundId, mandate: MandateId, state: InvestorState) -> InvestorId {
        let id = InvestorId::generate();
        let signed = state == InvestorState::Signed;
        let agreement = signed.then(|| self.subscription_agreement(fund));
        self.db.investors.insert(
            id,
            Investor {
                id,
                fund_id: fund,
                mandate_id: mandate,
                state,
                amount_total: Decimal::new(1_000_000, 0),
                investment_date: signed.then(|| {
                    NaiveDate::from_ymd_opt(2023, 6, 1).expect("date")
                }),
                fund_subscription_agreement: agreement,
            },
        );
        id
    }
}
