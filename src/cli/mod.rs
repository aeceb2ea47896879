//! CLI module for the calnotes application
//!
//! This module holds the argument surface and the application struct that
//! executes parsed commands against the note store.
mod app;
mod main;

pub use app::*;
pub use main::*;
