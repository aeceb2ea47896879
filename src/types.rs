//! Core shared types for the calnotes application.
//!
//! This module contains the Result alias used throughout the crate and the
//! clap subcommand surface.
use std::path::PathBuf;

use clap::Subcommand;

use crate::NotesError;

/// A specialized Result type for calnotes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Available subcommands for the calnotes application
#[derive(Subcommand)]
pub enum Commands {
    /// Add a new note
    Add {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: String,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Open content in editor before saving
        #[clap(short, long)]
        edit: bool,

        /// Category of the note (kişisel, önemli, hatırlatma, alışveriş, diğer)
        #[clap(short = 'C', long, default_value = "diğer")]
        category: String,

        /// Priority of the note (high, medium, low)
        #[clap(short, long, default_value = "medium")]
        priority: String,

        /// Reminder time of day (HH:MM)
        #[clap(long)]
        time: Option<String>,

        /// Tags to associate with the note (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Day the note belongs to (YYYY-MM-DD, defaults to today)
        #[clap(short, long)]
        date: Option<String>,

        /// Path to an image to attach to the note
        #[clap(short, long)]
        image: Option<PathBuf>,
    },

    /// View a note by ID
    View {
        /// ID of the note to view
        id: i64,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List notes with optional search, filter and sort
    List {
        /// Filter to apply: all, today, week, pinned, or a category name
        #[clap(short, long, default_value = "all")]
        filter: String,

        /// Search text matched against title, content and tags
        #[clap(short, long)]
        search: Option<String>,

        /// Sort order: date-desc, date-asc, title-asc, title-desc, priority
        #[clap(short = 'S', long, default_value = "date-desc")]
        sort: String,

        /// Limit the number of notes shown
        #[clap(short = 'n', long)]
        limit: Option<usize>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: i64,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Open current content in editor
        #[clap(short, long)]
        edit: bool,

        /// New category for the note
        #[clap(short = 'C', long)]
        category: Option<String>,

        /// New priority for the note
        #[clap(short, long)]
        priority: Option<String>,

        /// New reminder time of day (HH:MM)
        #[clap(long)]
        time: Option<String>,

        /// Remove the reminder time
        #[clap(long)]
        clear_time: bool,

        /// New owning day (YYYY-MM-DD)
        #[clap(short, long)]
        date: Option<String>,

        /// New tags (comma-separated, replaces existing tags)
        #[clap(short = 't', long)]
        tags: Option<String>,
    },

    /// Pin or unpin a note
    Pin {
        /// ID of the note to toggle
        id: i64,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: i64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Show a month of notes as a calendar grid
    Calendar {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[clap(short, long)]
        month: Option<String>,

        /// Day of the month to inspect
        #[clap(short, long)]
        select: Option<u32>,
    },

    /// Show note statistics
    Stats,

    /// Export all notes to a JSON file
    Export {
        /// Path for the export file (defaults to calnotes-YYYY-MM-DD.json)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Import notes from a JSON file, replacing the current collection
    Import {
        /// Path to the file to import from
        file: PathBuf,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Run the reminder scanner until interrupted
    Watch,

    /// Toggle the dark mode preference
    DarkMode,
}
