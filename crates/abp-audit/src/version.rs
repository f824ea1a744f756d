//! The immutable version record.

use abp_core::{ResourceKind, UserId, VersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tracked mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionEvent {
    Create,
    Update,
    Destroy,
}

impl VersionEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

/// One append-only audit record.
///
/// Field names are the external wire contract (spec'd by the history UI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub item_type: ResourceKind,
    pub item_id: String,
    pub event: VersionEvent,
    /// Acting user's id, when the mutation had an authenticated actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whodunnit: Option<String>,
    /// Snapshot of the record before the event (update/destroy only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Map<String, Value>>,
    /// Field-level diff `{attr: [old, new]}` (create/update only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_item_type: Option<ResourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_item_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Version {
    #[must_use]
    pub fn new(
        item_type: ResourceKind,
        item_id: String,
        event: VersionEvent,
        actor: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VersionId::generate(),
            item_type,
            item_id,
            event,
            whodunnit: actor.map(|id| id.to_string()),
            object: None,
            object_changes: None,
            parent_item_type: None,
            parent_item_id: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_object(mut self, object: Value) -> Self {
        if let Value::Object(map) = object {
            self.object = Some(map);
        }
        self
    }

    #[must_use]
    pub fn with_object_changes(mut self, changes: Map<String, Value>) -> Self {
        self.object_changes = Some(changes);
        self
    }

    /// Attach the parent item this record groups under in aggregate
    /// timelines.
    #[must_use]
    pub fn with_parent(mut self, kind: ResourceKind, id: String) -> Self {
        self.parent_item_type = Some(kind);
        self.parent_item_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_parent_option(self, parent: Option<(ResourceKind, String)>) -> Self {
        match parent {
            Some((kind, id)) => self.with_parent(kind, id),
            None => self,
        }
    }

    /// Whether this record belongs to the timeline of `(kind, id)`, either
    /// directly or through its parent item.
    #[must_use]
    pub fn belongs_to_timeline(&self, kind: ResourceKind, id: &str) -> bool {
        (self.item_type == kind && self.item_id == id)
            || (self.parent_item_type == Some(kind)
                && self.parent_item_id.as_deref() == Some(id))
    }
}
