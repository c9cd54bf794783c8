//! User profile types.
//!
//! Registration and session handling live outside the core; the collaboration
//! services only ever read a user's id and display name.

use chrono::{DateTime, Utc};

use super::UserId;

/// User record
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub course: Option<String>,
    pub year_of_study: Option<u32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a user
#[derive(Clone, Debug)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub course: Option<String>,
    pub year_of_study: Option<u32>,
}
