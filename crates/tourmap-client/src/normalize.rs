//! Conversion from wire rows to domain [`TourItem`]s.
//!
//! The upstream sends `""` for absent fields; those become `None` here.
//! Rows missing an id, a title, or a recognizable category code are skipped
//! rather than failing the whole page. Raw coordinates pass through
//! untouched: the coordinate normalizer runs lazily at render time.

use tourmap_core::{ContentType, TourItem};

use crate::types::{Page, RawTourItem};

/// Normalizes a single wire row, or `None` when it cannot represent a
/// usable item.
#[must_use]
pub fn normalize_item(raw: RawTourItem) -> Option<TourItem> {
    if raw.content_id.is_empty() || raw.title.is_empty() {
        tracing::debug!(content_id = %raw.content_id, "skipping row without id or title");
        return None;
    }
    let Some(category) = ContentType::from_code(&raw.content_type_id) else {
        tracing::debug!(
            content_id = %raw.content_id,
            code = %raw.content_type_id,
            "skipping row with unknown category code"
        );
        return None;
    };

    Some(TourItem {
        id: raw.content_id,
        category,
        title: raw.title,
        addr1: raw.addr1,
        addr2: non_empty(raw.addr2),
        raw_x: raw.map_x,
        raw_y: raw.map_y,
        thumbnail_url: non_empty(raw.first_image),
        last_modified: raw.modified_time,
    })
}

/// Normalizes a full page, preserving the pagination metadata.
#[must_use]
pub fn normalize_page(page: Page<RawTourItem>) -> Page<TourItem> {
    Page {
        items: page.items.into_iter().filter_map(normalize_item).collect(),
        page_no: page.page_no,
        num_of_rows: page.num_of_rows,
        total_count: page.total_count,
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
