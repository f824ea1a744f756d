//! `abp access` command implementation.
//!
//! Simulates permission decisions against a snapshot and exposes the
//! internal deny reason codes the API layer deliberately hides.

use std::path::PathBuf;
use std::str::FromStr;

use abp_core::{
    AccessDecision, Action, Channel, PermissionTarget, ResolvedGrants, ResourceKind, UserId,
    evaluate,
};
use abp_store::{Database, grants_for, scope};
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::parse_item;
use crate::snapshot;

/// Arguments for the `abp access` command.
#[derive(Args, Debug)]
pub struct AccessArgs {
    #[command(subcommand)]
    pub command: AccessCommands,
}

/// Access subcommands.
#[derive(Subcommand, Debug)]
pub enum AccessCommands {
    /// Simulate one permission decision.
    Check(CheckArgs),
    /// Print the actor's resolved grant set.
    Explain(ExplainArgs),
}

/// Arguments for `abp access check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Database snapshot (JSON).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Acting user id.
    #[arg(long)]
    pub user: String,

    /// Action: read, write, destroy, or export.
    #[arg(long, default_value = "read")]
    pub action: String,

    /// Resource reference, e.g. `mandate:<uuid>`.
    #[arg(long)]
    pub resource: String,

    /// Evaluate on the restricted Ews channel.
    #[arg(long, default_value_t = false)]
    pub ews: bool,
}

/// Arguments for `abp access explain`.
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Database snapshot (JSON).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Acting user id.
    #[arg(long)]
    pub user: String,
}

/// Simulated decision with its internal reason code.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

fn parse_action(value: &str) -> Result<Action> {
    Ok(match value {
        "read" => Action::Read,
        "write" => Action::Write,
        "destroy" => Action::Destroy,
        "export" => Action::Export,
        other => bail!("unknown action '{other}'"),
    })
}

fn parse_user(value: &str) -> Result<UserId> {
    UserId::from_str(value).with_context(|| format!("invalid user id '{value}'"))
}

/// Resolve a resource reference to its permission target.
///
/// # Errors
/// Fails for unknown ids or kinds the simulator does not cover.
pub fn resolve_target(db: &Database, kind: ResourceKind, id: &str) -> Result<PermissionTarget> {
    let uuid = uuid::Uuid::from_str(id).with_context(|| format!("invalid id '{id}'"))?;
    let target = match kind {
        ResourceKind::User => scope::user_target(db.user(uuid.into())?),
        ResourceKind::UserGroup => scope::user_group_target(db.user_group(uuid.into())?),
        ResourceKind::Mandate => scope::mandate_target(db.mandate(uuid.into())?),
        ResourceKind::Contact => scope::contact_target(db.contact(uuid.into())?),
        ResourceKind::Fund => scope::fund_target(db.fund(uuid.into())?),
        ResourceKind::Investor => scope::investor_target(db.investor(uuid.into())?),
        ResourceKind::FundCashflow => scope::fund_cashflow_target(db.fund_cashflow(uuid.into())?),
        ResourceKind::InvestorCashflow => {
            scope::investor_cashflow_target(db.investor_cashflow(uuid.into())?)
        }
        ResourceKind::Document => scope::document_target(db, db.document(uuid.into())?)?,
        ResourceKind::Activity => scope::activity_target(db, db.activity(uuid.into())?)?,
        ResourceKind::BankAccount => scope::bank_account_target(db, db.bank_account(uuid.into())?)?,
        ResourceKind::Address => scope::address_target(db, db.address(uuid.into())?)?,
        ResourceKind::Task => scope::task_target(db.task(uuid.into())?),
        ResourceKind::List => scope::list_target(db.list(uuid.into())?),
        ResourceKind::NewsletterSubscriber => {
            scope::subscriber_target(db.subscriber(uuid.into())?)
        }
        other => bail!("access check does not cover resource kind '{}'", other.as_str()),
    };
    Ok(target)
}

/// Run `abp access check`.
///
/// # Errors
/// Fails on unreadable snapshots or unresolvable references.
pub fn run_check(args: &CheckArgs) -> Result<CheckReport> {
    let db = snapshot::load(&args.snapshot)?;
    let user = parse_user(&args.user)?;
    let action = parse_action(&args.action)?;
    let (kind, id) = parse_item(&args.resource)?;
    let target = resolve_target(&db, kind, &id)?;
    let channel = if args.ews { Channel::Ews } else { Channel::Standard };

    let grants = grants_for(&db, user);
    let decision = evaluate(&grants, user, channel, action, &target);
    Ok(match decision {
        AccessDecision::Allow => CheckReport {
            decision: "allow",
            reason: None,
        },
        AccessDecision::Deny { reason } => CheckReport {
            decision: "deny",
            reason: Some(reason.as_str()),
        },
    })
}

/// Run `abp access explain`.
///
/// # Errors
/// Fails on unreadable snapshots or invalid user ids.
pub fn run_explain(args: &ExplainArgs) -> Result<ResolvedGrants> {
    let db = snapshot::load(&args.snapshot)?;
    let user = parse_user(&args.user)?;
    Ok(grants_for(&db, user))
}
