//! The query engine: search, filter and sort over the note collection.
//!
//! Queries are pure; they borrow the collection, never mutate it, and the
//! same query against the same collection always yields the same order.
use chrono::{Duration, NaiveDate};

use crate::{helper, Category, Note, NotesError, Result};

/// Which subset of notes to keep before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Notes whose owning date is the current day
    Today,
    /// Notes whose owning date falls in the trailing seven days
    Week,
    Pinned,
    Category(Category),
}

impl Filter {
    /// Accepts the fixed filter names or any category name.
    pub fn parse(value: &str) -> Result<Filter> {
        match value.trim() {
            "all" => Ok(Filter::All),
            "today" => Ok(Filter::Today),
            "week" => Ok(Filter::Week),
            "pinned" => Ok(Filter::Pinned),
            other => Category::parse(other).map(Filter::Category).map_err(|_| {
                NotesError::InvalidFormat {
                    message: format!(
                        "'{}' is not a filter, expected all, today, week, pinned or a category name",
                        other
                    ),
                }
            }),
        }
    }
}

/// Sort order for query results. Pinned notes always come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
    Priority,
}

impl SortKey {
    pub fn parse(value: &str) -> Result<SortKey> {
        match value.trim() {
            "date-desc" => Ok(SortKey::DateDesc),
            "date-asc" => Ok(SortKey::DateAsc),
            "title-asc" => Ok(SortKey::TitleAsc),
            "title-desc" => Ok(SortKey::TitleDesc),
            "priority" => Ok(SortKey::Priority),
            other => Err(NotesError::InvalidFormat {
                message: format!(
                    "'{}' is not a sort order, expected date-desc, date-asc, title-asc, title-desc or priority",
                    other
                ),
            }),
        }
    }
}

/// A complete query: free text, subset filter and sort order.
#[derive(Debug, Clone)]
pub struct NoteQuery {
    /// Matched case-insensitively against title, content and tags
    pub search: String,
    pub filter: Filter,
    pub sort: SortKey,
}

impl Default for NoteQuery {
    fn default() -> Self {
        NoteQuery {
            search: String::new(),
            filter: Filter::All,
            sort: SortKey::DateDesc,
        }
    }
}

/// Runs a query against the collection relative to the given day.
pub fn run_query<'a>(notes: &'a [Note], query: &NoteQuery, today: NaiveDate) -> Vec<&'a Note> {
    let needle = query.search.trim().to_lowercase();

    let mut result: Vec<&Note> = notes
        .iter()
        .filter(|note| matches_search(note, &needle))
        .filter(|note| matches_filter(note, query.filter, today))
        .collect();

    sort_notes(&mut result, query.sort);
    result
}

fn matches_search(note: &Note, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

fn matches_filter(note: &Note, filter: Filter, today: NaiveDate) -> bool {
    match filter {
        Filter::All => true,
        Filter::Today => note.date == today,
        Filter::Week => note.date >= today - Duration::days(7) && note.date <= today,
        Filter::Pinned => note.pinned,
        Filter::Category(category) => note.category == category,
    }
}

fn sort_notes(notes: &mut [&Note], key: SortKey) {
    // The sort is stable, so ties keep their insertion order.
    notes.sort_by(|a, b| {
        b.pinned.cmp(&a.pinned).then_with(|| match key {
            SortKey::DateDesc => b.timestamp.cmp(&a.timestamp),
            SortKey::DateAsc => a.timestamp.cmp(&b.timestamp),
            SortKey::TitleAsc => {
                helper::turkish_sort_key(&a.title).cmp(&helper::turkish_sort_key(&b.title))
            }
            SortKey::TitleDesc => {
                helper::turkish_sort_key(&b.title).cmp(&helper::turkish_sort_key(&a.title))
            }
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Priority;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn note(id: i64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: "içerik".to_string(),
            category: Category::Diger,
            priority: Priority::Medium,
            time: None,
            tags: Vec::new(),
            date: day(10),
            created: "10 Mart 2024 09:00".to_string(),
            timestamp: id,
            pinned: false,
            image: None,
        }
    }

    fn ids(result: &[&Note]) -> Vec<i64> {
        result.iter().map(|note| note.id).collect()
    }

    #[test]
    fn search_covers_title_content_and_tags() {
        let mut with_tag = note(1, "Toplantı");
        with_tag.tags = vec!["market".to_string()];
        let mut with_content = note(2, "Plan");
        with_content.content = "MARKET alışverişi".to_string();
        let with_title = note(3, "Market listesi");
        let unrelated = note(4, "Kitap");
        let notes = vec![with_tag, with_content, with_title, unrelated];

        let query = NoteQuery {
            search: "Market".to_string(),
            ..NoteQuery::default()
        };
        let result = run_query(&notes, &query, day(10));

        assert_eq!(ids(&result), vec![3, 2, 1]);
    }

    #[test]
    fn today_filter_matches_owning_date_only() {
        let mut yesterday = note(1, "Dün");
        yesterday.date = day(9);
        let today_note = note(2, "Bugün");
        let notes = vec![yesterday, today_note];

        let query = NoteQuery {
            filter: Filter::Today,
            ..NoteQuery::default()
        };
        let result = run_query(&notes, &query, day(10));

        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn week_filter_includes_day_seven_and_excludes_day_eight() {
        let mut seven_days_ago = note(1, "Sınırda");
        seven_days_ago.date = day(3);
        let mut eight_days_ago = note(2, "Dışarıda");
        eight_days_ago.date = day(2);
        let mut tomorrow = note(3, "Yarın");
        tomorrow.date = day(11);
        let notes = vec![seven_days_ago, eight_days_ago, tomorrow];

        let query = NoteQuery {
            filter: Filter::Week,
            ..NoteQuery::default()
        };
        let result = run_query(&notes, &query, day(10));

        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn category_filter_is_exact() {
        let mut shopping = note(1, "Market");
        shopping.category = Category::Alisveris;
        let personal = note(2, "Günlük");
        let notes = vec![shopping, personal];

        let query = NoteQuery {
            filter: Filter::Category(Category::Alisveris),
            ..NoteQuery::default()
        };
        assert_eq!(ids(&run_query(&notes, &query, day(10))), vec![1]);

        let query = NoteQuery {
            filter: Filter::Category(Category::Kisisel),
            ..NoteQuery::default()
        };
        assert!(run_query(&notes, &query, day(10)).is_empty());
    }

    #[test]
    fn pinned_notes_precede_under_every_sort_key() {
        let mut old_but_pinned = note(1, "Çok eski");
        old_but_pinned.pinned = true;
        old_but_pinned.priority = Priority::Low;
        let newer = note(2, "Aaa yeni");
        let notes = vec![newer, old_but_pinned];

        for sort in [
            SortKey::DateDesc,
            SortKey::DateAsc,
            SortKey::TitleAsc,
            SortKey::TitleDesc,
            SortKey::Priority,
        ] {
            let query = NoteQuery {
                sort,
                ..NoteQuery::default()
            };
            let result = run_query(&notes, &query, day(10));
            assert_eq!(result[0].id, 1, "pinned note must lead under {:?}", sort);
        }
    }

    #[test]
    fn date_sort_orders_by_creation_timestamp() {
        let notes = vec![note(5, "Orta"), note(9, "Yeni"), note(1, "Eski")];

        let query = NoteQuery::default();
        assert_eq!(ids(&run_query(&notes, &query, day(10))), vec![9, 5, 1]);

        let query = NoteQuery {
            sort: SortKey::DateAsc,
            ..NoteQuery::default()
        };
        assert_eq!(ids(&run_query(&notes, &query, day(10))), vec![1, 5, 9]);
    }

    #[test]
    fn title_sort_follows_the_turkish_alphabet() {
        let notes = vec![note(1, "Çilek"), note(2, "Domates"), note(3, "ceviz")];

        let query = NoteQuery {
            sort: SortKey::TitleAsc,
            ..NoteQuery::default()
        };
        assert_eq!(ids(&run_query(&notes, &query, day(10))), vec![3, 1, 2]);

        let query = NoteQuery {
            sort: SortKey::TitleDesc,
            ..NoteQuery::default()
        };
        assert_eq!(ids(&run_query(&notes, &query, day(10))), vec![2, 1, 3]);
    }

    #[test]
    fn priority_sort_puts_high_first() {
        let mut low = note(1, "Düşük");
        low.priority = Priority::Low;
        let mut high = note(2, "Yüksek");
        high.priority = Priority::High;
        let medium = note(3, "Orta");
        let notes = vec![low, high, medium];

        let query = NoteQuery {
            sort: SortKey::Priority,
            ..NoteQuery::default()
        };
        assert_eq!(ids(&run_query(&notes, &query, day(10))), vec![2, 3, 1]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut first = note(1, "Aynı an");
        first.timestamp = 1000;
        let mut second = note(2, "Aynı an iki");
        second.timestamp = 1000;
        let notes = vec![first, second];

        let result = run_query(&notes, &NoteQuery::default(), day(10));
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn identical_queries_return_identical_results() {
        let mut pinned = note(3, "Sabit");
        pinned.pinned = true;
        let notes = vec![note(1, "Bir"), note(2, "İki"), pinned];

        let query = NoteQuery {
            search: "i".to_string(),
            filter: Filter::All,
            sort: SortKey::TitleAsc,
        };
        let first = ids(&run_query(&notes, &query, day(10)));
        let second = ids(&run_query(&notes, &query, day(10)));
        assert_eq!(first, second);
    }

    #[test]
    fn filter_parse_accepts_names_and_categories() {
        assert_eq!(Filter::parse("all").unwrap(), Filter::All);
        assert_eq!(Filter::parse("pinned").unwrap(), Filter::Pinned);
        assert_eq!(
            Filter::parse("alışveriş").unwrap(),
            Filter::Category(Category::Alisveris)
        );
        assert!(Filter::parse("gelecek").is_err());
    }

    #[test]
    fn sort_parse_rejects_unknown_orders() {
        assert_eq!(SortKey::parse("priority").unwrap(), SortKey::Priority);
        assert!(SortKey::parse("relevance").is_err());
    }
}
