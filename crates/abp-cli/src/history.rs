//! `abp history` command implementation.

use std::path::PathBuf;

use abp_audit::{HistoryPage, Page, SortOrder, history_for};
use anyhow::Result;
use clap::Args;

use crate::parse_item;
use crate::snapshot;

/// Arguments for `abp history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Database snapshot (JSON).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Aggregate reference, e.g. `mandate:<uuid>`.
    #[arg(long)]
    pub item: String,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Entries per page.
    #[arg(long, default_value_t = 25)]
    pub page_size: usize,

    /// Newest entries first.
    #[arg(long, default_value_t = false)]
    pub desc: bool,
}

/// Run `abp history`: the merged timeline of the aggregate, including child
/// entries grouped under it.
///
/// # Errors
/// Fails on unreadable snapshots or malformed references.
pub fn run(args: &HistoryArgs) -> Result<HistoryPage> {
    let db = snapshot::load(&args.snapshot)?;
    let (kind, id) = parse_item(&args.item)?;
    let sort = if args.desc { SortOrder::Desc } else { SortOrder::Asc };
    Ok(history_for(
        kind,
        &id,
        &db.versions,
        Page::new(args.page, args.page_size),
        sort,
    ))
}
