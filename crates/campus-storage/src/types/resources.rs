//! Shared resource types (notes, links, files).

use chrono::{DateTime, Utc};

use super::{GroupId, ResourceId, UserId};

/// What kind of resource an entry is. Files and links are opaque URLs; the
/// platform never stores blobs itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Note,
    Link,
    File,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Note => "note",
            ResourceKind::Link => "link",
            ResourceKind::File => "file",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "note" => Some(ResourceKind::Note),
            "link" => Some(ResourceKind::Link),
            "file" => Some(ResourceKind::File),
            _ => None,
        }
    }
}

/// Shared resource record. Immutable once created; append-only per group.
#[derive(Clone, Debug)]
pub struct Resource {
    pub id: ResourceId,
    pub group_id: GroupId,
    pub creator_id: UserId,
    pub title: String,
    pub kind: ResourceKind,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for adding a resource
#[derive(Clone, Debug)]
pub struct CreateResourceParams {
    pub group_id: GroupId,
    pub creator_id: UserId,
    pub title: String,
    pub kind: ResourceKind,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
}
