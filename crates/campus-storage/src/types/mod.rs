//! Type definitions for Campus Connect storage.

mod events;
mod groups;
mod ids;
mod messages;
mod resources;
mod users;

// Re-export all types from submodules
pub use events::*;
pub use groups::*;
pub use ids::*;
pub use messages::*;
pub use resources::*;
pub use users::*;
