//! Data models for the Football Lore backend.
//!
//! Field names are camelCase on the wire and in the persisted documents, matching the frontend.

mod checkout;
mod credits;
mod story;

pub use checkout::*;
pub use credits::*;
pub use story::*;
