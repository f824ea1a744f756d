//! Append-only audit trail.
//!
//! Every create/update/destroy on a tracked entity appends one immutable
//! [`Version`]. The serialized field names (`item_type`, `item_id`, `event`,
//! `whodunnit`, `object`, `object_changes`, `parent_item_type`,
//! `parent_item_id`, `created_at`) and the `{attr: [old, new]}` diff format
//! are a wire contract consumed by the history UI; do not rename them.
//!
//! Versions are written alongside the primary mutation, inside its
//! transaction: a failed mutation writes no version. Child entities may
//! declare a parent item so their entries surface in the aggregate root's
//! merged timeline.

mod config;
mod diff;
mod history;
mod track;
mod version;

pub use config::AuditConfig;
pub use diff::diff_objects;
pub use history::{HistoryPage, Page, SortOrder, history_for};
pub use track::Trackable;
pub use version::{Version, VersionEvent};

use abp_core::UserId;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Version constructors bound to one ignore-list configuration.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    config: AuditConfig,
}

impl Recorder {
    #[must_use]
    pub const fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Record a create event. `object` stays empty; the diff carries the
    /// initial values as `{attr: [null, new]}`.
    #[must_use]
    pub fn created<T: Trackable>(
        &self,
        entity: &T,
        actor: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Version {
        let snapshot = snapshot(entity);
        let changes = diff_objects(&Value::Null, &snapshot, self.config.ignored_attributes());
        Version::new(T::KIND, entity.item_id(), VersionEvent::Create, actor, now)
            .with_object_changes(changes)
            .with_parent_option(entity.parent_item())
    }

    /// Record an update event, `None` when nothing but ignored attributes
    /// changed.
    #[must_use]
    pub fn updated<T: Trackable>(
        &self,
        before: &T,
        after: &T,
        actor: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Option<Version> {
        let old = snapshot(before);
        let new = snapshot(after);
        let changes = diff_objects(&old, &new, self.config.ignored_attributes());
        if changes.is_empty() {
            tracing::debug!(
                item_type = T::KIND.as_str(),
                item_id = after.item_id(),
                "update touched only ignored attributes, no version recorded"
            );
            return None;
        }
        Some(
            Version::new(T::KIND, after.item_id(), VersionEvent::Update, actor, now)
                .with_object(old)
                .with_object_changes(changes)
                .with_parent_option(after.parent_item()),
        )
    }

    /// Record a destroy event carrying the final snapshot.
    #[must_use]
    pub fn destroyed<T: Trackable>(
        &self,
        entity: &T,
        actor: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Version {
        Version::new(T::KIND, entity.item_id(), VersionEvent::Destroy, actor, now)
            .with_object(snapshot(entity))
            .with_parent_option(entity.parent_item())
    }
}

fn snapshot<T: serde::Serialize>(entity: &T) -> Value {
    serde_json::to_value(entity).unwrap_or(Value::Null)
}
