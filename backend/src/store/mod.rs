//! File-backed stores for stories and vote credits.
//!
//! Each store owns one JSON document that is read and rewritten whole on every mutation.

mod document;
mod ledger;
mod stories;
mod voting;

pub use ledger::*;
pub use stories::*;
pub use voting::*;
