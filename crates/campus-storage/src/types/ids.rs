//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use uuid::Uuid;

/// User identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

/// Study group identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub Uuid);

/// Message identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub Uuid);

/// Shared resource identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(pub Uuid);

/// Campus event identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);
