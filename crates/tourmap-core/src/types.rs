//! Domain types for the tour discovery pipeline.

use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint};
use crate::sort::SortOrder;

/// One point of interest from the upstream tourism service.
///
/// `id` is opaque and stable, and is the de-duplication key when pages are
/// merged. The coordinate fields are kept raw because their encoding is
/// unknown until [`crate::geo::normalize`] inspects them at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourItem {
    pub id: String,
    pub category: ContentType,
    pub title: String,
    pub addr1: String,
    pub addr2: Option<String>,
    pub raw_x: String,
    pub raw_y: String,
    pub thumbnail_url: Option<String>,
    /// 14-digit `YYYYMMDDHHmmss` timestamp string.
    pub last_modified: String,
}

impl TourItem {
    /// Lazily resolved geographic position.
    ///
    /// `None` when the raw coordinates fail conversion or bounding-box
    /// validation; such items stay in the list but are excluded from the map.
    #[must_use]
    pub fn geo_point(&self) -> Option<GeoPoint> {
        geo::normalize(&self.raw_x, &self.raw_y)
    }
}

/// The eight content categories the upstream service distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    TouristSpot,
    CulturalFacility,
    Festival,
    TravelCourse,
    LeisureSports,
    Lodging,
    Shopping,
    Restaurant,
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::TouristSpot,
        ContentType::CulturalFacility,
        ContentType::Festival,
        ContentType::TravelCourse,
        ContentType::LeisureSports,
        ContentType::Lodging,
        ContentType::Shopping,
        ContentType::Restaurant,
    ];

    /// Upstream `contentTypeId` wire code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ContentType::TouristSpot => "12",
            ContentType::CulturalFacility => "14",
            ContentType::Festival => "15",
            ContentType::TravelCourse => "25",
            ContentType::LeisureSports => "28",
            ContentType::Lodging => "32",
            ContentType::Shopping => "38",
            ContentType::Restaurant => "39",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "12" => Some(ContentType::TouristSpot),
            "14" => Some(ContentType::CulturalFacility),
            "15" => Some(ContentType::Festival),
            "25" => Some(ContentType::TravelCourse),
            "28" => Some(ContentType::LeisureSports),
            "32" => Some(ContentType::Lodging),
            "38" => Some(ContentType::Shopping),
            "39" => Some(ContentType::Restaurant),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ContentType::TouristSpot => "tourist spot",
            ContentType::CulturalFacility => "cultural facility",
            ContentType::Festival => "festival",
            ContentType::TravelCourse => "travel course",
            ContentType::LeisureSports => "leisure sports",
            ContentType::Lodging => "lodging",
            ContentType::Shopping => "shopping",
            ContentType::Restaurant => "restaurant",
        }
    }
}

/// The tuple of filters that defines one logical scroll/pagination session.
///
/// Two requests with equal contexts belong to the same session; a change of
/// context discards the old session entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterContext {
    pub area_code: Option<String>,
    /// Empty means all categories.
    pub content_types: Vec<ContentType>,
    pub keyword: Option<String>,
    pub sort: SortOrder,
}

impl Default for FilterContext {
    fn default() -> Self {
        Self {
            area_code: None,
            content_types: Vec::new(),
            keyword: None,
            sort: SortOrder::Recent,
        }
    }
}

impl FilterContext {
    /// The keyword with surrounding whitespace stripped, or `None` when the
    /// context is not a keyword search.
    #[must_use]
    pub fn trimmed_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// A keyword that is present but blank is a validation rejection, not a
    /// searchable context.
    #[must_use]
    pub fn has_blank_keyword(&self) -> bool {
        self.keyword.as_deref().is_some_and(|k| k.trim().is_empty())
    }

    /// The single category to pass upstream, when exactly one is selected.
    ///
    /// The upstream service accepts one `contentTypeId` per request, so a
    /// multi-category filter is fetched unfiltered and narrowed client-side.
    #[must_use]
    pub fn sole_content_type(&self) -> Option<ContentType> {
        match self.content_types.as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }

    /// Whether `category` passes this context's category filter.
    #[must_use]
    pub fn matches_category(&self, category: ContentType) -> bool {
        self.content_types.is_empty() || self.content_types.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_codes_round_trip() {
        for ct in ContentType::ALL {
            assert_eq!(ContentType::from_code(ct.code()), Some(ct));
        }
    }

    #[test]
    fn unknown_content_type_code_is_none() {
        assert!(ContentType::from_code("99").is_none());
        assert!(ContentType::from_code("").is_none());
    }

    #[test]
    fn blank_keyword_is_rejected_not_searchable() {
        let ctx = FilterContext {
            keyword: Some("   ".to_owned()),
            ..FilterContext::default()
        };
        assert!(ctx.has_blank_keyword());
        assert!(ctx.trimmed_keyword().is_none());
    }

    #[test]
    fn trimmed_keyword_strips_whitespace() {
        let ctx = FilterContext {
            keyword: Some("  경복궁 ".to_owned()),
            ..FilterContext::default()
        };
        assert_eq!(ctx.trimmed_keyword(), Some("경복궁"));
        assert!(!ctx.has_blank_keyword());
    }

    #[test]
    fn sole_content_type_only_for_single_selection() {
        let mut ctx = FilterContext::default();
        assert!(ctx.sole_content_type().is_none());

        ctx.content_types = vec![ContentType::Restaurant];
        assert_eq!(ctx.sole_content_type(), Some(ContentType::Restaurant));

        ctx.content_types = vec![ContentType::Restaurant, ContentType::Lodging];
        assert!(ctx.sole_content_type().is_none());
    }

    #[test]
    fn empty_category_filter_matches_everything() {
        let ctx = FilterContext::default();
        for ct in ContentType::ALL {
            assert!(ctx.matches_category(ct));
        }
    }
}
