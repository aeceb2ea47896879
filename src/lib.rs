//! Calendar-centric note-taking application library
//!
//! This library provides functionality for creating, storing, filtering and
//! managing day-scoped notes with categories, priorities, tags and reminder
//! times, plus a month-grid calendar view over the collection.

mod calendar;
mod cli;
mod config;
mod errors;
mod helper;
mod note;
mod query;
mod reminders;
mod stats;
mod storage;
mod types;

// Re-export key components
pub use calendar::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use note::*;
pub use query::*;
pub use reminders::*;
pub use stats::*;
pub use storage::*;
pub use types::*;
