//! Lifecycle state machines.
//!
//! Every machine is an enum state plus a static transition table; legality is
//! checked by the generic [`target_state`] lookup, so the rules are data and
//! can be audited without reading control flow. Side effects are returned to
//! the caller as [`JobRequest`] values rather than fired from callbacks; the
//! store stages them in the transaction outbox and hands them over only after
//! commit.
//!
//! A transition listing its target among its sources is an explicitly
//! permitted idempotent re-entry (e.g. finishing an already finished task).
//! Everything else fails as a validation error on `state`, never a crash.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationErrors;
use crate::fund::{Fund, Investor};
use crate::id::{SubscriberId, UserId};
use crate::mandate::Mandate;
use crate::newsletter::NewsletterSubscriber;
use crate::task::Task;

// ─────────────────────────────────────────────────────────────────────────────
// Generic transition table
// ─────────────────────────────────────────────────────────────────────────────

/// One row of a transition table.
#[derive(Debug, Clone, Copy)]
pub struct Transition<S: 'static, E: 'static> {
    pub event: E,
    pub from: &'static [S],
    pub to: S,
}

/// Look up the target state for `(from, event)`, `None` when illegal.
#[must_use]
pub fn target_state<S, E>(table: &[Transition<S, E>], from: S, event: E) -> Option<S>
where
    S: Copy + PartialEq,
    E: Copy + PartialEq,
{
    table
        .iter()
        .find(|row| row.event == event && row.from.contains(&from))
        .map(|row| row.to)
}

fn invalid_transition(entity: &'static str, state: &str, event: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "state",
        "invalid_transition",
        format!("{entity} cannot {event} from state {state}"),
    );
    errors
}

// ─────────────────────────────────────────────────────────────────────────────
// Side effects
// ─────────────────────────────────────────────────────────────────────────────

/// Job dispatched fire-and-forget after the owning transaction commits.
/// Delivery guarantees belong to the job runner, not this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum JobRequest {
    NewsletterConfirmationMail {
        subscriber_id: SubscriberId,
        email: String,
        token: String,
    },
    NewsletterExternalSync {
        subscriber_id: SubscriberId,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Mandate
// ─────────────────────────────────────────────────────────────────────────────

/// Mandate lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateState {
    Prospect,
    Client,
    Cancelled,
}

impl MandateState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Client => "client",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Mandate lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateEvent {
    BecomeClient,
    Cancel,
    BecomeProspect,
}

impl MandateEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BecomeClient => "become_client",
            Self::Cancel => "cancel",
            Self::BecomeProspect => "become_prospect",
        }
    }
}

/// Mandate transition table.
pub const MANDATE_TRANSITIONS: &[Transition<MandateState, MandateEvent>] = &[
    Transition {
        event: MandateEvent::BecomeClient,
        from: &[MandateState::Prospect, MandateState::Cancelled],
        to: MandateState::Client,
    },
    Transition {
        event: MandateEvent::Cancel,
        from: &[MandateState::Prospect, MandateState::Client],
        to: MandateState::Cancelled,
    },
    Transition {
        event: MandateEvent::BecomeProspect,
        from: &[MandateState::Client, MandateState::Cancelled],
        to: MandateState::Prospect,
    },
];

/// Apply a mandate lifecycle event in place.
///
/// `become_client` is guarded: both primary and secondary consultant must be
/// assigned, otherwise the mandate stays in its prior state.
///
/// # Errors
/// Returns the guard or transition failure as validation errors.
pub fn apply_mandate_event(
    mandate: &mut Mandate,
    event: MandateEvent,
) -> Result<(), ValidationErrors> {
    let Some(target) = target_state(MANDATE_TRANSITIONS, mandate.state, event) else {
        return Err(invalid_transition(
            "mandate",
            mandate.state.as_str(),
            event.as_str(),
        ));
    };

    if event == MandateEvent::BecomeClient && !mandate.consultants_assigned() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "primary_consultant",
            "consultants_missing",
            "primary and secondary consultant must be assigned",
        );
        return Err(errors);
    }

    tracing::debug!(
        mandate = %mandate.id,
        from = mandate.state.as_str(),
        to = target.as_str(),
        "mandate transition"
    );
    mandate.state = target;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Fund
// ─────────────────────────────────────────────────────────────────────────────

/// Fund lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundState {
    Open,
    Closed,
    Liquidated,
}

impl FundState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Liquidated => "liquidated",
        }
    }
}

/// Fund lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundEvent {
    Close,
    Reopen,
    Liquidate,
}

impl FundEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Liquidate => "liquidate",
        }
    }
}

/// Fund transition table.
pub const FUND_TRANSITIONS: &[Transition<FundState, FundEvent>] = &[
    Transition {
        event: FundEvent::Close,
        from: &[FundState::Open],
        to: FundState::Closed,
    },
    Transition {
        event: FundEvent::Reopen,
        from: &[FundState::Closed],
        to: FundState::Open,
    },
    Transition {
        event: FundEvent::Liquidate,
        from: &[FundState::Open, FundState::Closed],
        to: FundState::Liquidated,
    },
];

/// Apply a fund lifecycle event in place.
///
/// # Errors
/// Returns the transition failure as validation errors.
pub fn apply_fund_event(fund: &mut Fund, event: FundEvent) -> Result<(), ValidationErrors> {
    let Some(target) = target_state(FUND_TRANSITIONS, fund.state, event) else {
        return Err(invalid_transition("fund", fund.state.as_str(), event.as_str()));
    };
    fund.state = target;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Investor
// ─────────────────────────────────────────────────────────────────────────────

/// Investor signing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorState {
    Created,
    Signed,
}

impl InvestorState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Signed => "signed",
        }
    }
}

/// Sign an investor.
///
/// Sets the investment date to `today` when absent. The post-condition (a
/// signed investor carries an investment date and a subscription agreement)
/// is validated before the state is committed.
///
/// # Errors
/// Returns transition or post-condition failures as validation errors.
pub fn sign_investor(investor: &mut Investor, today: NaiveDate) -> Result<(), ValidationErrors> {
    if investor.state != InvestorState::Created {
        return Err(invalid_transition(
            "investor",
            investor.state.as_str(),
            "sign",
        ));
    }

    let mut signed = investor.clone();
    signed.state = InvestorState::Signed;
    if signed.investment_date.is_none() {
        signed.investment_date = Some(today);
    }

    let errors = signed.validate();
    if !errors.is_empty() {
        return Err(errors);
    }

    *investor = signed;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Investor cashflow
// ─────────────────────────────────────────────────────────────────────────────

/// Investor cashflow settlement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowState {
    Open,
    Finished,
}

impl CashflowState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Finished => "finished",
        }
    }
}

/// Finish an open investor cashflow.
///
/// # Errors
/// Returns the transition failure as validation errors.
pub fn finish_investor_cashflow(
    state: &mut CashflowState,
) -> Result<(), ValidationErrors> {
    if *state != CashflowState::Open {
        return Err(invalid_transition(
            "investor_cashflow",
            state.as_str(),
            "finish",
        ));
    }
    *state = CashflowState::Finished;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// Task completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Created,
    Finished,
}

impl TaskState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Finished => "finished",
        }
    }
}

/// Task lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    Finish,
    Unfinish,
}

impl TaskEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finish => "finish",
            Self::Unfinish => "unfinish",
        }
    }
}

/// Task transition table. Both events accept both states: re-finishing a
/// finished task refreshes finisher and timestamp, unfinishing a created
/// task is a no-op clear.
pub const TASK_TRANSITIONS: &[Transition<TaskState, TaskEvent>] = &[
    Transition {
        event: TaskEvent::Finish,
        from: &[TaskState::Created, TaskState::Finished],
        to: TaskState::Finished,
    },
    Transition {
        event: TaskEvent::Unfinish,
        from: &[TaskState::Created, TaskState::Finished],
        to: TaskState::Created,
    },
];

/// Apply a task lifecycle event in place. `finish` records the finisher and
/// timestamp; `unfinish` clears them.
///
/// # Errors
/// Returns the transition failure as validation errors.
pub fn apply_task_event(
    task: &mut Task,
    event: TaskEvent,
    actor: UserId,
    now: DateTime<Utc>,
) -> Result<(), ValidationErrors> {
    let Some(target) = target_state(TASK_TRANSITIONS, task.state, event) else {
        return Err(invalid_transition("task", task.state.as_str(), event.as_str()));
    };

    match event {
        TaskEvent::Finish => {
            task.finisher = Some(actor);
            task.finished_at = Some(now);
        }
        TaskEvent::Unfinish => {
            task.finisher = None;
            task.finished_at = None;
        }
    }
    task.state = target;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// List
// ─────────────────────────────────────────────────────────────────────────────

/// List archival state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    Active,
    Archived,
}

impl ListState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// List lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListEvent {
    Archive,
    Unarchive,
}

impl ListEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
        }
    }
}

/// List transition table.
pub const LIST_TRANSITIONS: &[Transition<ListState, ListEvent>] = &[
    Transition {
        event: ListEvent::Archive,
        from: &[ListState::Active],
        to: ListState::Archived,
    },
    Transition {
        event: ListEvent::Unarchive,
        from: &[ListState::Archived],
        to: ListState::Active,
    },
];

/// Apply a list lifecycle event.
///
/// # Errors
/// Returns the transition failure as validation errors.
pub fn apply_list_event(state: &mut ListState, event: ListEvent) -> Result<(), ValidationErrors> {
    let Some(target) = target_state(LIST_TRANSITIONS, *state, event) else {
        return Err(invalid_transition("list", state.as_str(), event.as_str()));
    };
    *state = target;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Newsletter subscriber
// ─────────────────────────────────────────────────────────────────────────────

/// Double-opt-in state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberState {
    Created,
    ConfirmationSent,
    Confirmed,
}

impl SubscriberState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ConfirmationSent => "confirmation_sent",
            Self::Confirmed => "confirmed",
        }
    }
}

/// Send the confirmation mail: generates the token and returns the mail job
/// for dispatch after commit.
///
/// # Errors
/// Returns the transition failure as validation errors.
pub fn send_subscriber_confirmation(
    subscriber: &mut NewsletterSubscriber,
    now: DateTime<Utc>,
) -> Result<JobRequest, ValidationErrors> {
    if subscriber.state != SubscriberState::Created {
        return Err(invalid_transition(
            "newsletter_subscriber",
            subscriber.state.as_str(),
            "send_confirmation",
        ));
    }

    let token = Uuid::new_v4().simple().to_string();
    subscriber.confirmation_token = Some(token.clone());
    subscriber.confirmation_sent_at = Some(now);
    subscriber.state = SubscriberState::ConfirmationSent;

    Ok(JobRequest::NewsletterConfirmationMail {
        subscriber_id: subscriber.id,
        email: subscriber.email.clone(),
        token,
    })
}

/// Confirm the subscription: clears the token, stamps `confirmed_at`, and
/// returns the external sync job for dispatch after commit.
///
/// # Errors
/// Returns the transition failure as validation errors.
pub fn confirm_subscriber(
    subscriber: &mut NewsletterSubscriber,
    now: DateTime<Utc>,
) -> Result<JobRequest, ValidationErrors> {
    if subscriber.state != SubscriberState::ConfirmationSent {
        return Err(invalid_transition(
            "newsletter_subscriber",
            subscriber.state.as_str(),
            "confirm",
        ));
    }

    subscriber.confirmation_token = None;
    subscriber.confirmed_at = Some(now);
    subscriber.state = SubscriberState::Confirmed;

    Ok(JobRequest::NewsletterExternalSync {
        subscriber_id: subscriber.id,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::id::{ContactId, FundId, InvestorId, MandateGroupId, MandateId, TaskId};

    fn mandate(state: MandateState) -> Mandate {
        Mandate {
            id: MandateId::generate(),
            title: "Family Office A".to_string(),
            state,
            category: None,
            primary_consultant: Some(ContactId::generate()),
            secondary_consultant: Some(ContactId::generate()),
            assistant: None,
            bookkeeper: None,
            valid_from: None,
            valid_to: None,
            legal_address: None,
            groups: BTreeSet::from([MandateGroupId::generate()]),
        }
    }

    fn investor(state: InvestorState) -> Investor {
        Investor {
            id: InvestorId::generate(),
            fund_id: FundId::generate(),
            mandate_id: MandateId::generate(),
            state,
            amount_total: Decimal::new(500_000, 0),
            investment_date: None,
            fund_subscription_agreement: Some(crate::id::DocumentId::generate()),
        }
    }

    fn task(state: TaskState) -> Task {
        Task {
            id: TaskId::generate(),
            subject: "Call the client".to_string(),
            description: None,
            state,
            creator: UserId::generate(),
            assignees: BTreeSet::new(),
            finisher: None,
            finished_at: None,
            due_at: None,
            created_at: Utc::now(),
        }
    }

    fn subscriber(state: SubscriberState) -> NewsletterSubscriber {
        NewsletterSubscriber {
            id: SubscriberId::generate(),
            email: "reader@example.org".to_string(),
            first_name: None,
            last_name: None,
            state,
            confirmation_token: None,
            confirmation_sent_at: None,
            confirmed_at: None,
        }
    }

    // ── mandate ────────────────────────────────────────────────────────────

    #[test]
    fn become_client_succeeds_with_both_consultants() {
        let mut subject = mandate(MandateState::Prospect);
        apply_mandate_event(&mut subject, MandateEvent::BecomeClient).expect("transition");
        assert_eq!(subject.state, MandateState::Client);
    }

    #[test]
    fn become_client_guard_keeps_prior_state() {
        let mut subject = mandate(MandateState::Prospect);
        subject.secondary_consultant = None;
        let errors =
            apply_mandate_event(&mut subject, MandateEvent::BecomeClient).expect_err("guard");
        assert_eq!(errors.errors()[0].code, "consultants_missing");
        assert_eq!(subject.state, MandateState::Prospect);
    }

    #[test]
    fn cancelled_mandate_can_become_client_again() {
        let mut subject = mandate(MandateState::Cancelled);
        apply_mandate_event(&mut subject, MandateEvent::BecomeClient).expect("transition");
        assert_eq!(subject.state, MandateState::Client);
    }

    #[test]
    fn cancel_from_cancelled_is_illegal() {
        let mut subject = mandate(MandateState::Cancelled);
        let errors = apply_mandate_event(&mut subject, MandateEvent::Cancel).expect_err("illegal");
        assert_eq!(errors.errors()[0].code, "invalid_transition");
    }

    // ── fund ───────────────────────────────────────────────────────────────

    #[test]
    fn fund_walks_open_closed_liquidated() {
        let mut fund = crate::fund::Fund {
            id: FundId::generate(),
            name: "Aurum Growth I".to_string(),
            state: FundState::Open,
            currency: "EUR".to_string(),
            strategy: None,
            inception_year: None,
            commercial_register_number: None,
            legal_address: None,
        };
        apply_fund_event(&mut fund, FundEvent::Close).expect("close");
        apply_fund_event(&mut fund, FundEvent::Reopen).expect("reopen");
        apply_fund_event(&mut fund, FundEvent::Liquidate).expect("liquidate");
        assert_eq!(fund.state, FundState::Liquidated);
        assert!(apply_fund_event(&mut fund, FundEvent::Reopen).is_err());
    }

    // ── investor ───────────────────────────────────────────────────────────

    #[test]
    fn sign_defaults_the_investment_date() {
        let mut subject = investor(InvestorState::Created);
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        sign_investor(&mut subject, today).expect("sign");
        assert_eq!(subject.state, InvestorState::Signed);
        assert_eq!(subject.investment_date, Some(today));
    }

    #[test]
    fn sign_keeps_an_explicit_investment_date() {
        let mut subject = investor(InvestorState::Created);
        let explicit = NaiveDate::from_ymd_opt(2023, 11, 20).expect("date");
        subject.investment_date = Some(explicit);
        sign_investor(&mut subject, NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"))
            .expect("sign");
        assert_eq!(subject.investment_date, Some(explicit));
    }

    #[test]
    fn sign_without_agreement_fails_and_preserves_state() {
        let mut subject = investor(InvestorState::Created);
        subject.fund_subscription_agreement = None;
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        let errors = sign_investor(&mut subject, today).expect_err("postcondition");
        assert_eq!(errors.errors()[0].field, "fund_subscription_agreement");
        assert_eq!(subject.state, InvestorState::Created);
        assert_eq!(subject.investment_date, None);
    }

    #[test]
    fn double_sign_is_illegal() {
        let mut subject = investor(InvestorState::Signed);
        subject.investment_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let errors = sign_investor(
            &mut subject,
            NaiveDate::from_ymd_opt(2024, 3, 2).expect("date"),
        )
        .expect_err("illegal");
        assert_eq!(errors.errors()[0].code, "invalid_transition");
    }

    // ── cashflow ───────────────────────────────────────────────────────────

    #[test]
    fn finish_cashflow_once_only() {
        let mut state = CashflowState::Open;
        finish_investor_cashflow(&mut state).expect("finish");
        assert_eq!(state, CashflowState::Finished);
        assert!(finish_investor_cashflow(&mut state).is_err());
    }

    // ── task ───────────────────────────────────────────────────────────────

    #[test]
    fn finish_records_finisher_and_timestamp() {
        let mut subject = task(TaskState::Created);
        let actor = UserId::generate();
        let now = Utc::now();
        apply_task_event(&mut subject, TaskEvent::Finish, actor, now).expect("finish");
        assert_eq!(subject.state, TaskState::Finished);
        assert_eq!(subject.finisher, Some(actor));
        assert_eq!(subject.finished_at, Some(now));
        assert!(subject.validate().is_empty());
    }

    #[test]
    fn refinishing_updates_the_finisher() {
        let mut subject = task(TaskState::Created);
        let first = UserId::generate();
        let second = UserId::generate();
        apply_task_event(&mut subject, TaskEvent::Finish, first, Utc::now()).expect("finish");
        apply_task_event(&mut subject, TaskEvent::Finish, second, Utc::now()).expect("refinish");
        assert_eq!(subject.finisher, Some(second));
    }

    #[test]
    fn unfinish_clears_finish_fields() {
        let mut subject = task(TaskState::Created);
        apply_task_event(&mut subject, TaskEvent::Finish, UserId::generate(), Utc::now())
            .expect("finish");
        apply_task_event(&mut subject, TaskEvent::Unfinish, UserId::generate(), Utc::now())
            .expect("unfinish");
        assert_eq!(subject.state, TaskState::Created);
        assert_eq!(subject.finisher, None);
        assert_eq!(subject.finished_at, None);
    }

    // ── list ───────────────────────────────────────────────────────────────

    #[test]
    fn archive_then_unarchive() {
        let mut state = ListState::Active;
        apply_list_event(&mut state, ListEvent::Archive).expect("archive");
        assert_eq!(state, ListState::Archived);
        apply_list_event(&mut state, ListEvent::Unarchive).expect("unarchive");
        assert_eq!(state, ListState::Active);
        assert!(apply_list_event(&mut state, ListEvent::Unarchive).is_err());
    }

    // ── newsletter ─────────────────────────────────────────────────────────

    #[test]
    fn confirmation_flow_generates_and_clears_token() {
        let mut subject = subscriber(SubscriberState::Created);
        let now = Utc::now();

        let job = send_subscriber_confirmation(&mut subject, now).expect("send");
        assert_eq!(subject.state, SubscriberState::ConfirmationSent);
        let token = subject.confirmation_token.clone().expect("token");
        match job {
            JobRequest::NewsletterConfirmationMail { token: mailed, .. } => {
                assert_eq!(mailed, token);
            }
            other => panic!("unexpected job: {other:?}"),
        }

        let job = confirm_subscriber(&mut subject, now).expect("confirm");
        assert_eq!(subject.state, SubscriberState::Confirmed);
        assert_eq!(subject.confirmation_token, None);
        assert_eq!(subject.confirmed_at, Some(now));
        assert_eq!(
            job,
            JobRequest::NewsletterExternalSync {
                subscriber_id: subject.id
            }
        );
        assert!(subject.validate().is_empty());
    }

    #[test]
    fn confirm_before_send_is_illegal() {
        let mut subject = subscriber(SubscriberState::Created);
        assert!(confirm_subscriber(&mut subject, Utc::now()).is_err());
    }
}
