//! The note record and its fixed vocabularies.
//!
//! This module contains the primary data types of the application: the Note
//! itself plus the Category and Priority enums it is classified with.
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{helper, NotesError, Result};

/// The fixed set of note categories. The serialized names are the Turkish
/// labels the data format has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "kişisel")]
    Kisisel,
    #[serde(rename = "önemli")]
    Onemli,
    #[serde(rename = "hatırlatma")]
    Hatirlatma,
    #[serde(rename = "alışveriş")]
    Alisveris,
    #[serde(rename = "diğer")]
    Diger,
}

impl Category {
    /// All categories in display order.
    pub fn all() -> [Category; 5] {
        [
            Category::Kisisel,
            Category::Onemli,
            Category::Hatirlatma,
            Category::Alisveris,
            Category::Diger,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Kisisel => "kişisel",
            Category::Onemli => "önemli",
            Category::Hatirlatma => "hatırlatma",
            Category::Alisveris => "alışveriş",
            Category::Diger => "diğer",
        }
    }

    /// Badge shown next to the category name in listings.
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Kisisel => "💕",
            Category::Onemli => "⭐",
            Category::Hatirlatma => "🔔",
            Category::Alisveris => "🛍️",
            Category::Diger => "🍪",
        }
    }

    pub fn parse(value: &str) -> Result<Category> {
        match value.trim() {
            "kişisel" => Ok(Category::Kisisel),
            "önemli" => Ok(Category::Onemli),
            "hatırlatma" => Ok(Category::Hatirlatma),
            "alışveriş" => Ok(Category::Alisveris),
            "diğer" => Ok(Category::Diger),
            other => Err(NotesError::InvalidFormat {
                message: format!(
                    "'{}' is not a category, expected one of: kişisel, önemli, hatırlatma, alışveriş, diğer",
                    other
                ),
            }),
        }
    }
}

/// Note priority, ordered high over medium over low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank; lower ranks sort first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn parse(value: &str) -> Result<Priority> {
        match value.trim() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(NotesError::InvalidFormat {
                message: format!("'{}' is not a priority, expected high, medium or low", other),
            }),
        }
    }
}

/// Represents a single note in our system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, derived from the creation timestamp in milliseconds
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content, plain text
    pub content: String,
    /// Category the note belongs to
    pub category: Category,
    /// Priority of the note
    pub priority: Priority,
    /// Optional reminder time of day, zero-padded `HH:MM`
    pub time: Option<String>,
    /// Tags for organization
    pub tags: Vec<String>,
    /// The day the note belongs to on the calendar
    pub date: NaiveDate,
    /// Human-readable creation label, e.g. `10 Mart 2024 14:30`
    pub created: String,
    /// Creation timestamp in milliseconds, used as the date sort key
    pub timestamp: i64,
    /// Whether the note is pinned above the others
    pub pinned: bool,
    /// Optional attached image as a base64 data URL
    pub image: Option<String>,
}

/// Input for creating a note. Identity, creation label and pin state are
/// assigned by the store, not the caller.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub priority: Priority,
    pub time: Option<String>,
    pub tags: Vec<String>,
    pub date: NaiveDate,
    pub image: Option<String>,
}

impl NoteDraft {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(NotesError::ValidationFailed {
                message: "title must not be empty".to_string(),
            });
        }
        if self.content.trim().is_empty() {
            return Err(NotesError::ValidationFailed {
                message: "content must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// A partial update applied to an existing note. Absent fields keep their
/// current value. The attached image and pin state are not editable here,
/// pinning has its own operation.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the reminder time, `Some(Some(t))` replaces it.
    pub time: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    /// True when no field is set, so applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.time.is_none()
            && self.date.is_none()
            && self.tags.is_none()
    }
}

impl Note {
    /// Creates a new note from a validated draft, assigning identity and
    /// creation metadata from the current local time.
    pub fn new(draft: NoteDraft) -> Self {
        let now = Local::now();
        Note {
            id: now.timestamp_millis(),
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            category: draft.category,
            priority: draft.priority,
            time: draft.time,
            tags: draft.tags,
            date: draft.date,
            created: helper::created_label(&now),
            timestamp: now.timestamp_millis(),
            pinned: false,
            image: draft.image,
        }
    }
}
