//! Coordinate normalization for upstream points of interest.
//!
//! The upstream service emits each item's position as two opaque string
//! fields whose encoding varies: either plain WGS84 degrees, or a
//! fixed-point planar encoding scaled by `10^7`. [`normalize`] auto-detects
//! the encoding, converts to degrees, and validates the result against the
//! serviced country's bounding box. Absence of a result is an ordinary
//! outcome, never an error.

/// Serviced bounding box. Points outside it are treated as upstream data
/// corruption and rejected.
pub const MIN_LAT: f64 = 32.5;
pub const MAX_LAT: f64 = 43.5;
pub const MIN_LNG: f64 = 123.5;
pub const MAX_LNG: f64 = 132.5;

/// Camera fallback when a computed viewport degenerates (Seoul city hall).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 37.5665,
    lng: 126.978,
};

/// A validated WGS84 position inside the serviced bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Magnitude at or above which a value cannot be a degree and must be the
/// scaled fixed-point encoding.
const SCALED_THRESHOLD: f64 = 1_000_000.0;
const SCALE_DIVISOR: f64 = 10_000_000.0;

/// Converts a raw `(x, y)` coordinate pair of unknown encoding into a
/// validated [`GeoPoint`], or `None` when either field is non-numeric,
/// zero, non-finite, or the result falls outside the serviced bounds.
#[must_use]
pub fn normalize(raw_x: &str, raw_y: &str) -> Option<GeoPoint> {
    let x = parse_coord(raw_x)?;
    let y = parse_coord(raw_y)?;

    let (lng, lat) = if x.abs() >= SCALED_THRESHOLD || y.abs() >= SCALED_THRESHOLD {
        (x / SCALE_DIVISOR, y / SCALE_DIVISOR)
    } else {
        (x, y)
    };

    let point = GeoPoint { lat, lng };
    in_service_bounds(point).then_some(point)
}

/// Zero is the upstream missing-value sentinel, not a real coordinate.
fn parse_coord(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value != 0.0).then_some(value)
}

#[must_use]
pub fn in_service_bounds(point: GeoPoint) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&point.lat) && (MIN_LNG..=MAX_LNG).contains(&point.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_pass_through_unchanged() {
        let point = normalize("126.9780", "37.5665").expect("in-box degrees");
        assert!((point.lng - 126.978).abs() < 1e-9);
        assert!((point.lat - 37.5665).abs() < 1e-9);
    }

    #[test]
    fn scaled_encoding_is_divided_down() {
        let point = normalize("1269780000", "375665000").expect("scaled pair");
        assert!((point.lng - 126.978).abs() < 1e-6);
        assert!((point.lat - 37.5665).abs() < 1e-6);
    }

    #[test]
    fn scaled_detection_triggers_on_either_field() {
        // y alone crosses the threshold; both fields must be divided.
        let point = normalize("126.978", "375665000");
        assert!(point.is_none(), "mixed encodings cannot both land in-box");
    }

    #[test]
    fn zero_is_treated_as_absent() {
        assert!(normalize("0", "37.5").is_none());
        assert!(normalize("127.0", "0").is_none());
        assert!(normalize("0.0", "0.0").is_none());
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        assert!(normalize("abc", "def").is_none());
        assert!(normalize("", "37.5").is_none());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(normalize("NaN", "37.5").is_none());
        assert!(normalize("127.0", "NaN").is_none());
        assert!(normalize("inf", "37.5").is_none());
    }

    #[test]
    fn out_of_box_degrees_are_rejected() {
        // Tokyo: valid WGS84, outside the serviced country.
        assert!(normalize("139.6917", "35.6895").is_none());
        // Valid longitude, corrupted latitude.
        assert!(normalize("127.0", "3.75").is_none());
    }

    #[test]
    fn scaled_out_of_box_is_rejected() {
        assert!(normalize("1396917000", "356895000").is_none());
    }

    #[test]
    fn bounding_box_edges_are_inclusive() {
        assert!(normalize("123.5", "32.5").is_some());
        assert!(normalize("132.5", "43.5").is_some());
    }

    #[test]
    fn default_center_lies_in_service_bounds() {
        assert!(in_service_bounds(DEFAULT_CENTER));
    }
}
