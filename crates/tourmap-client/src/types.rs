//! Upstream response envelope and wire types.
//!
//! Every response nests its payload at `response.body.items.item`, where
//! `item` is a single object or an array depending on result cardinality (a
//! known upstream quirk), and `items` itself degrades to an empty string on
//! empty result sets. [`Envelope`] and its custom `items` deserializer
//! normalize all of those shapes at the boundary so consumers only ever see
//! a plain vector.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Top-level envelope: `{ "response": { "header": ..., "body": ... } }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    pub response: ResponseWrap<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ResponseWrap<T> {
    pub header: Header,
    /// Absent when the upstream reports an application-level error.
    #[serde(default)]
    pub body: Option<Body<T>>,
}

/// Result header; `result_code` is `"0000"` on success.
#[derive(Debug, Deserialize)]
pub struct Header {
    #[serde(rename = "resultCode", default)]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Body<T> {
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<T>,
    #[serde(rename = "numOfRows", default)]
    pub num_of_rows: u32,
    #[serde(rename = "pageNo", default)]
    pub page_no: u32,
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
}

impl<T> Default for Body<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            num_of_rows: 0,
            page_no: 0,
            total_count: 0,
        }
    }
}

/// One page of results with the upstream's pagination metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_no: u32,
    pub num_of_rows: u32,
    pub total_count: u64,
}

impl<T> From<Body<T>> for Page<T> {
    fn from(body: Body<T>) -> Self {
        Self {
            items: body.items,
            page_no: body.page_no,
            num_of_rows: body.num_of_rows,
            total_count: body.total_count,
        }
    }
}

/// Normalizes the `items` field: absent, `null`, `""`, a bare object, or
/// `{ "item": object | array | null }` all become a vector.
fn deserialize_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    items_from_value(value).map_err(serde::de::Error::custom)
}

fn items_from_value<T: DeserializeOwned>(
    value: serde_json::Value,
) -> Result<Vec<T>, serde_json::Error> {
    use serde_json::Value;

    let item = match value {
        Value::Object(mut map) => map.remove("item").unwrap_or(Value::Null),
        // The upstream sends "" in place of the items object on empty pages.
        Value::Null | Value::String(_) => Value::Null,
        other => other,
    };

    match item {
        Value::Null => Ok(Vec::new()),
        Value::Array(values) => values.into_iter().map(serde_json::from_value).collect(),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}

/// A list or search row as delivered on the wire. Every field is a string
/// and most are optional in practice, so all default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTourItem {
    #[serde(rename = "contentid", default)]
    pub content_id: String,
    #[serde(rename = "contenttypeid", default)]
    pub content_type_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub addr1: String,
    #[serde(default)]
    pub addr2: String,
    #[serde(rename = "mapx", default)]
    pub map_x: String,
    #[serde(rename = "mapy", default)]
    pub map_y: String,
    #[serde(rename = "firstimage", default)]
    pub first_image: String,
    #[serde(rename = "modifiedtime", default)]
    pub modified_time: String,
}

/// `detailCommon` payload: shared descriptive fields for any content type.
#[derive(Debug, Clone, Deserialize)]
pub struct CommonDetail {
    #[serde(rename = "contentid", default)]
    pub content_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub addr1: String,
    #[serde(default)]
    pub addr2: String,
}

/// `detailIntro` payload: operating information. Field availability varies
/// by content type; absent fields stay empty.
#[derive(Debug, Clone, Deserialize)]
pub struct IntroDetail {
    #[serde(rename = "contentid", default)]
    pub content_id: String,
    #[serde(rename = "usetime", default)]
    pub use_time: String,
    #[serde(rename = "restdate", default)]
    pub rest_date: String,
    #[serde(rename = "infocenter", default)]
    pub info_center: String,
    #[serde(default)]
    pub parking: String,
}

/// One entry from `detailImage`.
#[derive(Debug, Clone, Deserialize)]
pub struct TourImage {
    #[serde(rename = "originimgurl", default)]
    pub origin_img_url: String,
    #[serde(rename = "smallimageurl", default)]
    pub small_image_url: String,
    #[serde(rename = "imgname", default)]
    pub img_name: String,
}

/// `detailWithTour` payload: barrier-free accessibility information.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessibilityDetail {
    #[serde(rename = "contentid", default)]
    pub content_id: String,
    #[serde(default)]
    pub parking: String,
    #[serde(rename = "publictransport", default)]
    pub public_transport: String,
    #[serde(default)]
    pub wheelchair: String,
    #[serde(default)]
    pub elevator: String,
    #[serde(default)]
    pub restroom: String,
    #[serde(rename = "braileblock", default)]
    pub braille_block: String,
    #[serde(rename = "helpdog", default)]
    pub guide_dog: String,
    #[serde(rename = "audioguide", default)]
    pub audio_guide: String,
}
