//! Data models for the activity portal.

mod dashboard;
mod submission;
mod user;

pub use dashboard::*;
pub use submission::*;
pub use user::*;
