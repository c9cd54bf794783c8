//! Core domain services for Campus Connect: study group registry, membership
//! control, group chat, and shared resources.
//!
//! Every service is constructed with an explicit storage handle; there is no
//! process-wide database state. Authentication and presentation live outside
//! this crate: callers pass an already-authenticated [`campus_storage::UserId`]
//! and decide how to render the outcome values these services return.

mod chat;
mod dashboard;
mod error;
mod events;
mod membership;
mod registry;
mod resources;

pub use chat::{CollaborationLog, MessageView, PostedMessage, DEFAULT_MESSAGE_LIMIT};
pub use dashboard::{Dashboard, DashboardService};
pub use error::CoreError;
pub use events::{EventBoard, NewEvent};
pub use membership::{JoinOutcome, LeaveOutcome, MembershipController};
pub use registry::{GroupRegistry, NewGroup};
pub use resources::{NewResource, ResourceLedger};

#[cfg(test)]
mod tests;
