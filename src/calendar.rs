//! Month grid construction for the calendar view.
//!
//! The grid is a pure description: which day numbers pad the first week,
//! one cell per day with its note count and flags, and the padding that
//! rounds the last week out. Rendering is the caller's business.
use chrono::{Datelike, NaiveDate};

use crate::{helper, Note};

/// One day of the displayed month.
#[derive(Debug, Clone)]
pub struct DayCell {
    /// Day of month, 1-based
    pub day: u32,
    pub date: NaiveDate,
    /// Number of notes whose owning date is this day
    pub note_count: usize,
    pub is_today: bool,
    pub is_selected: bool,
}

impl DayCell {
    pub fn has_notes(&self) -> bool {
        self.note_count > 0
    }

    /// The count badge only appears once a day holds more than one note.
    pub fn shows_badge(&self) -> bool {
        self.note_count > 1
    }
}

/// A month of cells, padded to whole weeks with Monday as the first column.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Display title, e.g. `Mart 2024`
    pub title: String,
    /// Day numbers from the tail of the previous month
    pub leading: Vec<u32>,
    pub days: Vec<DayCell>,
    /// Day numbers from the head of the next month
    pub trailing: Vec<u32>,
}

impl MonthGrid {
    pub fn cell_count(&self) -> usize {
        self.leading.len() + self.days.len() + self.trailing.len()
    }
}

/// Number of days in a calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Builds the grid for a month, counting notes into their owning days.
pub fn month_grid(
    year: i32,
    month: u32,
    notes: &[Note],
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> MonthGrid {
    let day_count = days_in_month(year, month);

    // Monday is the first column, so a month starting on Sunday gets six
    // leading filler cells.
    let offset = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.weekday().num_days_from_monday())
        .unwrap_or(0);

    let (prev_year, prev_mon) = prev_month(year, month);
    let prev_month_days = days_in_month(prev_year, prev_mon);
    let leading: Vec<u32> = (0..offset)
        .map(|i| prev_month_days - offset + 1 + i)
        .collect();

    let mut days = Vec::with_capacity(day_count as usize);
    for day in 1..=day_count {
        let date = match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => date,
            None => continue,
        };
        let note_count = notes.iter().filter(|note| note.date == date).count();
        days.push(DayCell {
            day,
            date,
            note_count,
            is_today: date == today,
            is_selected: selected == Some(date),
        });
    }

    // Pad the final week so the grid is always whole weeks.
    let filled = leading.len() + days.len();
    let remainder = filled % 7;
    let trailing: Vec<u32> = if remainder == 0 {
        Vec::new()
    } else {
        (1..=(7 - remainder) as u32).collect()
    };

    let month_name = month
        .checked_sub(1)
        .and_then(|index| helper::MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("?");

    MonthGrid {
        year,
        month,
        title: format!("{} {}", month_name, year),
        leading,
        days,
        trailing,
    }
}
