//! Deterministic client-side ordering of result pages.
//!
//! The upstream service does not sort server-side in a way that stays
//! stable across pages for every ordering, so each page is re-sorted here
//! before it is merged into a session. Sorts are stable and non-mutating:
//! callers keep their sequence, equal items keep their relative order.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use serde::{Deserialize, Serialize};

use crate::types::TourItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Descending by modification timestamp.
    Recent,
    /// Ascending by title under Korean collation.
    Name,
}

impl SortOrder {
    /// Upstream `arrange` parameter. A server-side hint only; pages are
    /// still re-sorted client-side.
    #[must_use]
    pub fn arrange_code(self) -> &'static str {
        match self {
            SortOrder::Recent => "C",
            SortOrder::Name => "A",
        }
    }
}

/// Returns a new ordered sequence; never reorders `items` in place.
#[must_use]
pub fn sort_items(items: &[TourItem], order: SortOrder) -> Vec<TourItem> {
    let mut sorted = items.to_vec();
    match order {
        SortOrder::Recent => sorted.sort_by(cmp_recent),
        SortOrder::Name => sorted.sort_by(|a, b| cmp_title(&a.title, &b.title)),
    }
    sorted
}

/// Descending by timestamp; unparseable timestamps order last.
fn cmp_recent(a: &TourItem, b: &TourItem) -> Ordering {
    match (
        parse_timestamp(&a.last_modified),
        parse_timestamp(&b.last_modified),
    ) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Slices the fixed-width `YYYYMMDDHHmmss` fields positionally. The wire
/// format has no separators, so a general date parser does not apply.
fn parse_timestamp(raw: &str) -> Option<(u16, u8, u8, u8, u8, u8)> {
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((
        raw[0..4].parse().ok()?,
        raw[4..6].parse().ok()?,
        raw[6..8].parse().ok()?,
        raw[8..10].parse().ok()?,
        raw[10..12].parse().ok()?,
        raw[12..14].parse().ok()?,
    ))
}

fn cmp_title(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}

thread_local! {
    /// Korean-locale collator, built once per thread (`Collator` is not
    /// `Sync`). Construction only fails when the compiled collation data
    /// is unavailable; code-point order is the fallback.
    static COLLATOR: Option<Collator> =
        Collator::try_new(&locale!("ko").into(), CollatorOptions::new()).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentType;

    fn item(id: &str, title: &str, last_modified: &str) -> TourItem {
        TourItem {
            id: id.to_owned(),
            category: ContentType::TouristSpot,
            title: title.to_owned(),
            addr1: "서울특별시".to_owned(),
            addr2: None,
            raw_x: "126.978".to_owned(),
            raw_y: "37.5665".to_owned(),
            thumbnail_url: None,
            last_modified: last_modified.to_owned(),
        }
    }

    #[test]
    fn recent_orders_newest_first() {
        let items = vec![
            item("a", "A", "20240101000000"),
            item("b", "B", "20240301000000"),
        ];
        let sorted = sort_items(&items, SortOrder::Recent);
        assert_eq!(sorted[0].id, "b");
        assert_eq!(sorted[1].id, "a");
    }

    #[test]
    fn recent_does_not_mutate_input() {
        let items = vec![
            item("a", "A", "20240101000000"),
            item("b", "B", "20240301000000"),
        ];
        let _ = sort_items(&items, SortOrder::Recent);
        assert_eq!(items[0].id, "a", "caller's sequence must be untouched");
    }

    #[test]
    fn recent_puts_unparseable_timestamps_last() {
        let items = vec![
            item("bad", "X", "not-a-timestamp"),
            item("good", "Y", "20240101000000"),
        ];
        let sorted = sort_items(&items, SortOrder::Recent);
        assert_eq!(sorted[0].id, "good");
        assert_eq!(sorted[1].id, "bad");
    }

    #[test]
    fn recent_is_stable_on_equal_timestamps() {
        let items = vec![
            item("first", "A", "20240101000000"),
            item("second", "B", "20240101000000"),
        ];
        let sorted = sort_items(&items, SortOrder::Recent);
        assert_eq!(sorted[0].id, "first");
        assert_eq!(sorted[1].id, "second");
    }

    #[test]
    fn name_sort_is_idempotent() {
        let items = vec![
            item("c", "남산서울타워", "20240101000000"),
            item("a", "경복궁", "20240101000000"),
            item("b", "광화문", "20240101000000"),
        ];
        let once = sort_items(&items, SortOrder::Name);
        let twice = sort_items(&once, SortOrder::Name);
        assert_eq!(once, twice);
    }

    #[test]
    fn name_sort_ascends_by_title() {
        let items = vec![
            item("2", "Busan Aquarium", "20240101000000"),
            item("1", "Andong Village", "20240101000000"),
        ];
        let sorted = sort_items(&items, SortOrder::Name);
        assert_eq!(sorted[0].id, "1");
    }

    #[test]
    fn name_sort_agrees_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let items = vec![
                        item("b", "광화문", "20240101000000"),
                        item("a", "경복궁", "20240101000000"),
                    ];
                    sort_items(&items, SortOrder::Name)[0].id.clone()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("no panic"), "a");
        }
    }

    #[test]
    fn parse_timestamp_rejects_wrong_width() {
        assert!(parse_timestamp("2024").is_none());
        assert!(parse_timestamp("202401010000001").is_none());
        assert!(parse_timestamp("2024010100000x").is_none());
    }

    #[test]
    fn arrange_codes_match_upstream_convention() {
        assert_eq!(SortOrder::Recent.arrange_code(), "C");
        assert_eq!(SortOrder::Name.arrange_code(), "A");
    }
}
