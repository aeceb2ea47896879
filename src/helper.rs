use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, Timelike};

use crate::{NotesError, Result};

/// Turkish month names, used for creation labels and calendar titles.
pub const MONTH_NAMES: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos",
    "Eylül", "Ekim", "Kasım", "Aralık",
];

/// The Turkish alphabet in collation order, plus q/w/x at their usual slots.
const TURKISH_ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

/// Letters rank above any plain code point so digits and punctuation sort first.
const LETTER_BASE: u32 = 0x0100_0000;

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Validates a time-of-day string and normalizes it to zero-padded `HH:MM`.
pub fn parse_time(value: &str) -> Result<String> {
    let parsed = NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        NotesError::InvalidFormat {
            message: format!("'{}' is not a valid time, expected HH:MM", value),
        }
    })?;
    Ok(parsed.format("%H:%M").to_string())
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        NotesError::InvalidFormat {
            message: format!("'{}' is not a valid date, expected YYYY-MM-DD", value),
        }
    })
}

/// Parses a `YYYY-MM` month selector into a (year, month) pair.
pub fn parse_month(value: &str) -> Result<(i32, u32)> {
    let first_day = format!("{}-01", value.trim());
    let date = NaiveDate::parse_from_str(&first_day, "%Y-%m-%d").map_err(|_| {
        NotesError::InvalidFormat {
            message: format!("'{}' is not a valid month, expected YYYY-MM", value),
        }
    })?;
    Ok((date.year(), date.month()))
}

/// Formats a creation moment as the human-readable label stored on a note,
/// e.g. `10 Mart 2024 14:30`.
pub fn created_label(moment: &DateTime<Local>) -> String {
    format!(
        "{} {} {} {:02}:{:02}",
        moment.day(),
        MONTH_NAMES[moment.month0() as usize],
        moment.year(),
        moment.hour(),
        moment.minute()
    )
}

/// Folds a character for Turkish case-insensitive comparison; the dotted and
/// dotless I pairs do not follow Unicode's default lowercase mapping.
fn turkish_fold(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Builds a collation key ordering strings by the Turkish alphabet,
/// case-insensitively. Characters outside the alphabet fall back to their
/// code point and sort ahead of letters.
pub fn turkish_sort_key(text: &str) -> Vec<u32> {
    text.chars()
        .map(|c| {
            let folded = turkish_fold(c);
            match TURKISH_ALPHABET.chars().position(|a| a == folded) {
                Some(idx) => LETTER_BASE + idx as u32,
                None => folded as u32,
            }
        })
        .collect()
}
