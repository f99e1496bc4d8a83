//! HTTP handlers for every page.
//!
//! Handlers follow one shape: resolve state, call the backend at most once, render
//! a view or redirect.

mod admin;
mod form;
mod landing;

pub use admin::*;
pub use form::*;
pub use landing::*;
