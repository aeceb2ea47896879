//! On-demand statistics over the note collection.
use chrono::{Datelike, Duration, NaiveDate};

use crate::{Category, Note};

/// A summary of the collection, recomputed from scratch on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub pinned: usize,
    /// Notes whose owning date falls in the trailing seven days
    pub this_week: usize,
    /// Notes whose owning date is in the current calendar month
    pub this_month: usize,
    /// Counts per category in display order; empty categories are skipped
    pub by_category: Vec<(Category, usize)>,
}

pub fn compute_stats(notes: &[Note], today: NaiveDate) -> Statistics {
    // Same window as the week filter: [today - 7 days, today], inclusive.
    let week_start = today - Duration::days(7);

    let mut by_category = Vec::new();
    for category in Category::all() {
        let count = notes
            .iter()
            .filter(|note| note.category == category)
            .count();
        if count > 0 {
            by_category.push((category, count));
        }
    }

    Statistics {
        total: notes.len(),
        pinned: notes.iter().filter(|note| note.pinned).count(),
        this_week: notes
            .iter()
            .filter(|note| note.date >= week_start && note.date <= today)
            .count(),
        this_month: notes
            .iter()
            .filter(|note| {
                note.date.year() == today.year() && note.date.month() == today.month()
            })
            .count(),
        by_category,
    }
}
