//! Core types for the Aurum back-office platform.
//!
//! This crate is the policy heart of the platform: the typed entity graph
//! (contacts, mandates, funds, investors, documents, tasks), the group/role
//! resolver and permission evaluator, and the lifecycle state machines.
//! Everything here is a pure decision function over in-memory state; storage,
//! transactions, and the audit trail live in `abp-store` and `abp-audit`.

pub mod activity;
pub mod bank_account;
pub mod contact;
pub mod document;
pub mod error;
pub mod fund;
pub mod id;
pub mod lifecycle;
pub mod list;
pub mod mandate;
pub mod newsletter;
pub mod owner;
pub mod policy;
pub mod task;
pub mod user;

pub use activity::{Activity, ActivityKind};
pub use bank_account::BankAccount;
pub use contact::{
    Address, ComplianceDetail, Contact, ContactDetail, ContactDetailCategory, ContactKind,
    ContactRelationship, Gender, KagbClassification, OrganizationDetails, PersonDetails,
    RelationshipRole, TaxDetail, TaxNumber,
};
pub use document::{Document, DocumentCategory, RETENTION_LOCK_HOURS};
pub use error::{Error, FieldError, ValidationErrors, check_date_range};
pub use fund::{
    CashflowTotals, Fund, FundCashflow, FundReport, FundReportKind, Investor, InvestorCashflow,
};
pub use id::{
    ActivityId, AddressId, BankAccountId, ComplianceDetailId, ContactDetailId, ContactId,
    ContactRelationshipId, DocumentId, FundCashflowId, FundId, FundReportId, InvestorCashflowId,
    InvestorId, ListId, MandateGroupId, MandateId, MandateMemberId, SubscriberId, TaskCommentId,
    TaskId, TaxDetailId, UserGroupId, UserId, VersionId,
};
pub use lifecycle::{
    CashflowState, FundEvent, FundState, InvestorState, JobRequest, ListEvent, ListState,
    MandateEvent, MandateState, SubscriberState, TaskEvent, TaskState, Transition,
    apply_fund_event, apply_list_event, apply_mandate_event, apply_task_event,
    confirm_subscriber, finish_investor_cashflow, send_subscriber_confirmation, sign_investor,
    target_state,
};
pub use list::List;
pub use mandate::{Mandate, MandateGroup, MandateGroupKind, MandateMember, MemberKind};
pub use newsletter::NewsletterSubscriber;
pub use owner::{ActivitySubject, AddressOwner, BankAccountOwner, DocumentOwner};
pub use policy::{
    AccessDecision, Action, Channel, DenyReason, EWS_SURFACE, PermissionTarget, ResolvedGrants,
    ResourceKind, Role, RoleDomain, TargetScope, evaluate, resolve_grants,
};
pub use task::{Task, TaskComment};
pub use user::{User, UserGroup};
