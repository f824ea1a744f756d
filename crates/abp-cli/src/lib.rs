//! `abp` command implementations.
//!
//! Every command operates on an offline JSON snapshot of the database, so
//! operators can simulate permission decisions, inspect timelines, and run
//! invariant checks without touching a live system.

pub mod access;
pub mod doctor;
pub mod history;
pub mod snapshot;

use abp_core::ResourceKind;
use anyhow::{Context, Result, bail};

/// Parse a `kind:id` resource reference.
///
/// # Errors
/// Fails on a missing `:` separator or an unknown kind.
pub fn parse_item(reference: &str) -> Result<(ResourceKind, String)> {
    let Some((kind, id)) = reference.split_once(':') else {
        bail!("resource reference must be <kind>:<id>, got '{reference}'");
    };
    Ok((parse_kind(kind)?, id.to_string()))
}

/// Parse a snake_case resource kind name.
///
/// # Errors
/// Fails on unknown kinds.
pub fn parse_kind(kind: &str) -> Result<ResourceKind> {
    serde_json::from_value(serde_json::Value::String(kind.to_string()))
        .with_context(|| format!("unknown resource kind '{kind}'"))
}
