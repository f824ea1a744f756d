//! Contacts and their dependent records.
//!
//! A contact is either a natural person or an organization; the split is a
//! tagged union so person-only fields (birth dates, insurance flags) and
//! organization-only fields (VAT id, LEI) cannot leak across kinds.
//! Dependent records (addresses, contact details, compliance and tax
//! profiles, typed relationships) surface in the audit trail under their
//! owning contact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationErrors, check_date_range};
use crate::id::{
    AddressId, ComplianceDetailId, ContactDetailId, ContactId, ContactRelationshipId, TaxDetailId,
};
use crate::owner::AddressOwner;

// ─────────────────────────────────────────────────────────────────────────────
// Contact
// ─────────────────────────────────────────────────────────────────────────────

/// Gender of a natural person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Diverse,
}

/// Person-only attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    /// Statutory vs private health insurance flag.
    #[serde(default)]
    pub health_insurance_private: bool,
    /// Long-term care insurance flag.
    #[serde(default)]
    pub care_insurance: bool,
}

/// Organization-only attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_register_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
    /// Legal Entity Identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lei: Option<String>,
}

/// Person/organization tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContactKind {
    Person(PersonDetails),
    Organization(OrganizationDetails),
}

impl ContactKind {
    #[must_use]
    pub const fn is_person(&self) -> bool {
        matches!(self, Self::Person(_))
    }

    #[must_use]
    pub const fn is_organization(&self) -> bool {
        matches!(self, Self::Organization(_))
    }
}

/// Person or organization record.
///
/// `legal_address` and `primary_contact_address` are single-owner
/// back-references: at most one address per contact holds each designation,
/// enforced by the store's designation swap on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(flatten)]
    pub kind: ContactKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<AddressId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_address: Option<AddressId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Display name: "Last, First" for persons, the registered name for
    /// organizations.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.kind {
            ContactKind::Person(person) => {
                format!("{}, {}", person.last_name, person.first_name)
            }
            ContactKind::Organization(org) => org.name.clone(),
        }
    }

    /// Field-level validation.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match &self.kind {
            ContactKind::Person(person) => {
                if person.first_name.trim().is_empty() {
                    errors.add("first_name", "blank", "must be present");
                }
                if person.last_name.trim().is_empty() {
                    errors.add("last_name", "blank", "must be present");
                }
                check_date_range(
                    &mut errors,
                    "date_of_death",
                    person.date_of_birth,
                    person.date_of_death,
                );
            }
            ContactKind::Organization(org) => {
                if org.name.trim().is_empty() {
                    errors.add("name", "blank", "must be present");
                }
            }
        }
        errors
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Address
// ─────────────────────────────────────────────────────────────────────────────

/// Postal address. The `legal_address` / `primary_contact_address` flags
/// request a designation; the owning record's back-reference is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub owner: AddressOwner,
    pub street_and_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addition: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub legal_address: bool,
    #[serde(default)]
    pub primary_contact_address: bool,
}

impl Address {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.street_and_number.trim().is_empty() {
            errors.add("street_and_number", "blank", "must be present");
        }
        if self.postal_code.trim().is_empty() {
            errors.add("postal_code", "blank", "must be present");
        }
        if self.city.trim().is_empty() {
            errors.add("city", "blank", "must be present");
        }
        if self.country.trim().is_empty() {
            errors.add("country", "blank", "must be present");
        }
        errors
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contact details
// ─────────────────────────────────────────────────────────────────────────────

/// Channel of a contact detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactDetailCategory {
    Phone,
    Fax,
    Email,
    Website,
}

/// Phone/fax/email/website entry of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetail {
    pub id: ContactDetailId,
    pub contact_id: ContactId,
    pub category: ContactDetailCategory,
    pub value: String,
    /// Preferred entry within its category.
    #[serde(default)]
    pub primary: bool,
}

impl ContactDetail {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.value.trim().is_empty() {
            errors.add("value", "blank", "must be present");
        }
        if self.category == ContactDetailCategory::Email && !self.value.contains('@') {
            errors.add("value", "invalid", "is not an email address");
        }
        errors
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compliance / tax profiles
// ─────────────────────────────────────────────────────────────────────────────

/// KAGB investor classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KagbClassification {
    Private,
    SemiProfessional,
    Professional,
}

/// Compliance profile (1:1 with a contact).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceDetail {
    pub id: ComplianceDetailId,
    pub contact_id: ContactId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kagb_classification: Option<KagbClassification>,
    #[serde(default)]
    pub politically_exposed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retirement_age: Option<u8>,
}

/// Tax profile (1:1 with a contact).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetail {
    pub id: TaxDetailId,
    pub contact_id: ContactId,
    #[serde(default)]
    pub us_person: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_tax_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_fatca_status: Option<String>,
    /// Country-scoped tax identifiers.
    #[serde(default)]
    pub tax_numbers: Vec<TaxNumber>,
}

/// One country-scoped tax identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxNumber {
    pub country: String,
    pub number: String,
}

impl TaxDetail {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.us_person && self.us_tax_number.is_none() {
            errors.add("us_tax_number", "blank", "must be present for US persons");
        }
        errors
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Relationships
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a contact relationship.
///
/// The vocabulary is partitioned by the (source kind, target kind) pairing;
/// the three sets are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipRole {
    // person → person
    Spouse,
    Parent,
    Sibling,
    Guardian,
    // person → organization
    Employee,
    ManagingDirector,
    BoardMember,
    Beneficiary,
    // organization → organization
    Shareholder,
    Subsidiary,
    Custodian,
}

impl RelationshipRole {
    /// Roles legal for the given source/target pairing.
    #[must_use]
    pub const fn vocabulary(source_is_person: bool, target_is_person: bool) -> &'static [Self] {
        match (source_is_person, target_is_person) {
            (true, true) => &[Self::Spouse, Self::Parent, Self::Sibling, Self::Guardian],
            (true, false) => &[
                Self::Employee,
                Self::ManagingDirector,
                Self::BoardMember,
                Self::Beneficiary,
            ],
            (false, false) => &[Self::Shareholder, Self::Subsidiary, Self::Custodian],
            // organization → person relationships are expressed from the
            // person side only
            (false, true) => &[],
        }
    }

    /// Whether this role is legal for the given pairing.
    #[must_use]
    pub fn valid_for(self, source_is_person: bool, target_is_person: bool) -> bool {
        Self::vocabulary(source_is_person, target_is_person).contains(&self)
    }
}

/// Typed edge between two contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRelationship {
    pub id: ContactRelationshipId,
    pub source_id: ContactId,
    pub target_id: ContactId,
    pub role: RelationshipRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ContactRelationship {
    /// Validate the role against the kinds of both endpoints.
    #[must_use]
    pub fn validate(&self, source: &Contact, target: &Contact) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.source_id == self.target_id {
            errors.add("target_id", "self_reference", "must differ from source");
        }
        if !self
            .role
            .valid_for(source.kind.is_person(), target.kind.is_person())
        {
            errors.add("role", "invalid_for_pairing", "is not in the role set for this contact pairing");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn person(first: &str, last: &str) -> Contact {
        Contact {
            id: ContactId::generate(),
            kind: ContactKind::Person(PersonDetails {
                first_name: first.to_string(),
                last_name: last.to_string(),
                gender: Gender::Female,
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
        }
    }

    fn organization(name: &str) -> Contact {
        Contact {
            id: ContactId::generate(),
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
        }
    }

    fn relationship(source: &Contact, target: &Contact, role: RelationshipRole) -> ContactRelationship {
        ContactRelationship {
            id: ContactRelationshipId::generate(),
            source_id: source.id,
            target_id: target.id,
            role,
            comment: None,
        }
    }

    #[test]
    fn display_name_orders_person_names() {
        assert_eq!(person("Ada", "Lovelace").display_name(), "Lovelace, Ada");
        assert_eq!(organization("Acme Holding").display_name(), "Acme Holding");
    }

    #[test]
    fn death_before_birth_is_rejected() {
        let mut contact = person("Ada", "Lovelace");
        if let ContactKind::Person(ref mut details) = contact.kind {
            details.date_of_birth = NaiveDate::from_ymd_opt(1980, 5, 1);
            details.date_of_death = NaiveDate::from_ymd_opt(1979, 5, 1);
        }
        let errors = contact.validate();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field, "date_of_death");
    }

    #[test]
    fn shareholder_is_org_to_org_only() {
        let alice = person("Alice", "Adams");
        let bob = person("Bob", "Brown");
        let acme = organization("Acme Holding");
        let subco = organization("SubCo");

        let errors = relationship(&acme, &subco, RelationshipRole::Shareholder)
            .validate(&acme, &subco);
        assert!(errors.is_empty());

        let errors = relationship(&alice, &bob, RelationshipRole::Shareholder)
            .validate(&alice, &bob);
        assert_eq!(errors.errors()[0].code, "invalid_for_pairing");
    }

    #[test]
    fn employee_requires_person_to_org() {
        let alice = person("Alice", "Adams");
        let acme = organization("Acme Holding");
        assert!(relationship(&alice, &acme, RelationshipRole::Employee)
            .validate(&alice, &acme)
            .is_empty());
        assert!(!relationship(&acme, &alice, RelationshipRole::Employee)
            .validate(&acme, &alice)
            .is_empty());
    }

    #[test]
    fn self_reference_is_rejected() {
        let alice = person("Alice", "Adams");
        let edge = relationship(&alice, &alice, RelationshipRole::Spouse);
        let errors = edge.validate(&alice, &alice);
        assert!(errors.errors().iter().any(|e| e.code == "self_reference"));
    }

    #[test]
    fn email_detail_requires_at_sign() {
        let detail = ContactDetail {
            id: ContactDetailId::generate(),
            contact_id: ContactId::generate(),
            category: ContactDetailCategory::Email,
            value: "not-an-email".to_string(),
            primary: true,
        };
        assert_eq!(detail.validate().errors()[0].code, "invalid");
    }
}
