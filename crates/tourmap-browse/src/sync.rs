//! Bidirectional selection sync between a map surface and a list surface.
//!
//! The controller is the single owner of selection state; the surfaces are
//! dumb renderers behind the [`MapSurface`] and [`ListSurface`] traits and
//! never talk to each other. Every transition is idempotent, so repeated
//! events (double clicks, re-hovers) cause no redundant camera movement or
//! highlight churn.

use std::collections::HashMap;

use tourmap_core::geo::{self, GeoPoint};
use tourmap_core::TourItem;

/// Half-width in degrees of the fallback viewport around the default center.
const FALLBACK_SPAN: f64 = 0.05;

/// A map pin for one item. Items without a resolvable position get no
/// marker but remain selectable in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub position: GeoPoint,
    pub title: String,
}

/// A camera rectangle in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Viewport {
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.south + self.north) / 2.0,
            lng: (self.west + self.east) / 2.0,
        }
    }
}

/// Current highlight state, mirrored onto both surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<String>,
    pub hovered: Option<String>,
}

/// Rendering operations the map side must support.
pub trait MapSurface {
    fn set_markers(&mut self, markers: Vec<Marker>);
    fn add_markers(&mut self, markers: Vec<Marker>);
    fn pan_to(&mut self, position: GeoPoint);
    fn fit_viewport(&mut self, viewport: Viewport);
    fn open_callout(&mut self, id: &str);
    fn close_callout(&mut self);
    fn show_preview(&mut self, id: &str);
    fn hide_preview(&mut self);
}

/// Rendering operations the list side must support.
pub trait ListSurface {
    fn highlight(&mut self, id: &str);
    fn clear_highlight(&mut self);
    fn scroll_to(&mut self, id: &str);
    fn preview_row(&mut self, id: &str);
    fn clear_preview(&mut self);
}

/// The smallest viewport containing every point, or a fixed span around
/// the default center when no point is usable.
#[must_use]
pub fn fit_all(points: &[GeoPoint]) -> Viewport {
    let mut south = f64::INFINITY;
    let mut west = f64::INFINITY;
    let mut north = f64::NEG_INFINITY;
    let mut east = f64::NEG_INFINITY;
    for point in points {
        south = south.min(point.lat);
        west = west.min(point.lng);
        north = north.max(point.lat);
        east = east.max(point.lng);
    }
    let viewport = Viewport {
        south,
        west,
        north,
        east,
    };
    if points.is_empty() || !geo::in_service_bounds(viewport.center()) {
        return default_viewport();
    }
    viewport
}

fn default_viewport() -> Viewport {
    let center = geo::DEFAULT_CENTER;
    Viewport {
        south: center.lat - FALLBACK_SPAN,
        west: center.lng - FALLBACK_SPAN,
        north: center.lat + FALLBACK_SPAN,
        east: center.lng + FALLBACK_SPAN,
    }
}

pub struct MapListSyncController<M: MapSurface, L: ListSurface> {
    map: M,
    list: L,
    state: SelectionState,
    /// Resolved position per item id; items that failed normalization are
    /// absent and get list-only treatment.
    points: HashMap<String, GeoPoint>,
}

impl<M: MapSurface, L: ListSurface> MapListSyncController<M, L> {
    pub fn new(map: M, list: L) -> Self {
        Self {
            map,
            list,
            state: SelectionState::default(),
            points: HashMap::new(),
        }
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.state
    }

    /// Replaces the full item set, as after a filter change. Rebuilds the
    /// markers, fits the camera over them once, and drops the selection if
    /// its item no longer exists.
    pub fn replace_items(&mut self, items: &[TourItem]) {
        self.points.clear();
        let markers = self.collect_markers(items);
        let positions: Vec<GeoPoint> = markers.iter().map(|m| m.position).collect();
        self.map.set_markers(markers);
        self.map.fit_viewport(fit_all(&positions));

        if let Some(selected) = self.state.selected.clone() {
            if !items.iter().any(|item| item.id == selected) {
                self.clear_selection();
            }
        }
        if let Some(hovered) = self.state.hovered.clone() {
            if !items.iter().any(|item| item.id == hovered) {
                self.hover_item(None);
            }
        }
    }

    /// Adds a freshly loaded page without touching the camera; mid-scroll
    /// appends must not yank the viewport away from the user.
    pub fn append_items(&mut self, items: &[TourItem]) {
        let markers = self.collect_markers(items);
        if !markers.is_empty() {
            self.map.add_markers(markers);
        }
    }

    /// Selects an item from either surface. The map pans and opens a
    /// callout only when the item has a resolvable position; the list
    /// highlight and scroll happen regardless.
    pub fn select_item(&mut self, id: &str) {
        if self.state.selected.as_deref() == Some(id) {
            return;
        }
        // Selection subsumes any hover preview.
        if self.state.hovered.take().is_some() {
            self.map.hide_preview();
            self.list.clear_preview();
        }
        self.state.selected = Some(id.to_owned());

        if let Some(position) = self.points.get(id).copied() {
            self.map.pan_to(position);
            self.map.open_callout(id);
        } else {
            tracing::debug!(id, "selected item has no map position; list-only");
            self.map.close_callout();
        }
        self.list.highlight(id);
        self.list.scroll_to(id);
    }

    pub fn clear_selection(&mut self) {
        if self.state.selected.take().is_none() {
            return;
        }
        self.map.close_callout();
        self.list.clear_highlight();
    }

    /// Hover preview from either surface, mirrored onto both: the marker
    /// preview when the item has a position, and the list row always.
    /// `None` ends the hover. A hover over the selected item is ignored so
    /// the callout is not downgraded to a preview.
    pub fn hover_item(&mut self, id: Option<&str>) {
        if id.is_some() && id == self.state.selected.as_deref() {
            return;
        }
        match id {
            Some(id) => {
                if self.state.hovered.as_deref() == Some(id) {
                    return;
                }
                self.state.hovered = Some(id.to_owned());
                if self.points.contains_key(id) {
                    self.map.show_preview(id);
                }
                self.list.preview_row(id);
            }
            None => {
                if self.state.hovered.take().is_some() {
                    self.map.hide_preview();
                    self.list.clear_preview();
                }
            }
        }
    }

    fn collect_markers(&mut self, items: &[TourItem]) -> Vec<Marker> {
        let mut markers = Vec::new();
        for item in items {
            if let Some(position) = item.geo_point() {
                self.points.insert(item.id.clone(), position);
                markers.push(Marker {
                    id: item.id.clone(),
                    position,
                    title: item.title.clone(),
                });
            }
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourmap_core::ContentType;

    #[derive(Debug, PartialEq)]
    enum MapCall {
        SetMarkers(usize),
        AddMarkers(usize),
        PanTo(GeoPoint),
        FitViewport(Viewport),
        OpenCallout(String),
        CloseCallout,
        ShowPreview(String),
        HidePreview,
    }

    #[derive(Default)]
    struct RecordingMap {
        calls: Vec<MapCall>,
    }

    impl MapSurface for RecordingMap {
        fn set_markers(&mut self, markers: Vec<Marker>) {
            self.calls.push(MapCall::SetMarkers(markers.len()));
        }
        fn add_markers(&mut self, markers: Vec<Marker>) {
            self.calls.push(MapCall::AddMarkers(markers.len()));
        }
        fn pan_to(&mut self, position: GeoPoint) {
            self.calls.push(MapCall::PanTo(position));
        }
        fn fit_viewport(&mut self, viewport: Viewport) {
            self.calls.push(MapCall::FitViewport(viewport));
        }
        fn open_callout(&mut self, id: &str) {
            self.calls.push(MapCall::OpenCallout(id.to_owned()));
        }
        fn close_callout(&mut self) {
            self.calls.push(MapCall::CloseCallout);
        }
        fn show_preview(&mut self, id: &str) {
            self.calls.push(MapCall::ShowPreview(id.to_owned()));
        }
        fn hide_preview(&mut self) {
            self.calls.push(MapCall::HidePreview);
        }
    }

    #[derive(Debug, PartialEq)]
    enum ListCall {
        Highlight(String),
        ClearHighlight,
        ScrollTo(String),
        PreviewRow(String),
        ClearPreview,
    }

    #[derive(Default)]
    struct RecordingList {
        calls: Vec<ListCall>,
    }

    impl ListSurface for RecordingList {
        fn highlight(&mut self, id: &str) {
            self.calls.push(ListCall::Highlight(id.to_owned()));
        }
        fn clear_highlight(&mut self) {
            self.calls.push(ListCall::ClearHighlight);
        }
        fn scroll_to(&mut self, id: &str) {
            self.calls.push(ListCall::ScrollTo(id.to_owned()));
        }
        fn preview_row(&mut self, id: &str) {
            self.calls.push(ListCall::PreviewRow(id.to_owned()));
        }
        fn clear_preview(&mut self) {
            self.calls.push(ListCall::ClearPreview);
        }
    }

    fn item(id: &str, x: &str, y: &str) -> TourItem {
        TourItem {
            id: id.to_owned(),
            category: ContentType::TouristSpot,
            title: format!("item {id}"),
            addr1: String::new(),
            addr2: None,
            raw_x: x.to_owned(),
            raw_y: y.to_owned(),
            thumbnail_url: None,
            last_modified: "20240101000000".to_owned(),
        }
    }

    fn controller() -> MapListSyncController<RecordingMap, RecordingList> {
        MapListSyncController::new(RecordingMap::default(), RecordingList::default())
    }

    #[test]
    fn fit_all_covers_every_point() {
        let viewport = fit_all(&[
            GeoPoint {
                lat: 37.5,
                lng: 126.9,
            },
            GeoPoint {
                lat: 35.1,
                lng: 129.0,
            },
        ]);
        assert!((viewport.south - 35.1).abs() < 1e-9);
        assert!((viewport.north - 37.5).abs() < 1e-9);
        assert!((viewport.west - 126.9).abs() < 1e-9);
        assert!((viewport.east - 129.0).abs() < 1e-9);
    }

    #[test]
    fn fit_all_of_nothing_falls_back_to_default_center() {
        let viewport = fit_all(&[]);
        let center = viewport.center();
        assert!((center.lat - geo::DEFAULT_CENTER.lat).abs() < 1e-9);
        assert!((center.lng - geo::DEFAULT_CENTER.lng).abs() < 1e-9);
    }

    #[test]
    fn replace_items_skips_unmappable_items_but_keeps_them_selectable() {
        let mut controller = controller();
        controller.replace_items(&[
            item("a", "126.978", "37.5665"),
            item("b", "0", "0"), // missing-coordinate sentinel
        ]);

        assert_eq!(controller.map.calls[0], MapCall::SetMarkers(1));
        assert!(matches!(controller.map.calls[1], MapCall::FitViewport(_)));

        controller.select_item("b");
        assert_eq!(controller.selection().selected.as_deref(), Some("b"));
        // No pan for an unmappable item, but the list still reacts.
        assert!(!controller
            .map
            .calls
            .iter()
            .any(|c| matches!(c, MapCall::PanTo(_))));
        assert!(controller
            .list
            .calls
            .contains(&ListCall::Highlight("b".to_owned())));
    }

    #[test]
    fn select_pans_and_highlights_both_surfaces() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "126.978", "37.5665")]);
        controller.select_item("a");

        assert!(controller
            .map
            .calls
            .iter()
            .any(|c| matches!(c, MapCall::PanTo(_))));
        assert!(controller
            .map
            .calls
            .contains(&MapCall::OpenCallout("a".to_owned())));
        assert_eq!(
            controller.list.calls,
            vec![
                ListCall::Highlight("a".to_owned()),
                ListCall::ScrollTo("a".to_owned())
            ]
        );
    }

    #[test]
    fn reselecting_the_same_item_is_a_no_op() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "126.978", "37.5665")]);
        controller.select_item("a");
        let map_calls = controller.map.calls.len();
        let list_calls = controller.list.calls.len();

        controller.select_item("a");
        assert_eq!(controller.map.calls.len(), map_calls);
        assert_eq!(controller.list.calls.len(), list_calls);
    }

    #[test]
    fn hover_over_selected_item_keeps_the_callout() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "126.978", "37.5665")]);
        controller.select_item("a");

        controller.hover_item(Some("a"));
        assert!(controller.selection().hovered.is_none());
        assert!(!controller
            .map
            .calls
            .iter()
            .any(|c| matches!(c, MapCall::ShowPreview(_))));
    }

    #[test]
    fn hover_end_without_hover_does_nothing() {
        let mut controller = controller();
        controller.hover_item(None);
        assert!(controller.map.calls.is_empty());
    }

    #[test]
    fn selection_subsumes_an_active_hover() {
        let mut controller = controller();
        controller.replace_items(&[
            item("a", "126.978", "37.5665"),
            item("b", "127.1", "37.4"),
        ]);

        controller.hover_item(Some("a"));
        controller.select_item("b");

        assert!(controller.selection().hovered.is_none());
        assert!(controller.map.calls.contains(&MapCall::HidePreview));
        assert!(controller.list.calls.contains(&ListCall::ClearPreview));
    }

    #[test]
    fn hover_previews_on_both_surfaces() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "126.978", "37.5665")]);

        controller.hover_item(Some("a"));
        assert!(controller
            .map
            .calls
            .contains(&MapCall::ShowPreview("a".to_owned())));
        assert!(controller
            .list
            .calls
            .contains(&ListCall::PreviewRow("a".to_owned())));

        controller.hover_item(None);
        assert!(controller.map.calls.contains(&MapCall::HidePreview));
        assert!(controller.list.calls.contains(&ListCall::ClearPreview));
    }

    #[test]
    fn hover_on_unmappable_item_previews_the_list_row_only() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "0", "0")]);

        controller.hover_item(Some("a"));
        assert!(!controller
            .map
            .calls
            .iter()
            .any(|c| matches!(c, MapCall::ShowPreview(_))));
        assert!(controller
            .list
            .calls
            .contains(&ListCall::PreviewRow("a".to_owned())));
    }

    #[test]
    fn replace_drops_selection_of_vanished_item() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "126.978", "37.5665")]);
        controller.select_item("a");

        controller.replace_items(&[item("b", "127.1", "37.4")]);
        assert!(controller.selection().selected.is_none());
        assert!(controller.list.calls.contains(&ListCall::ClearHighlight));
    }

    #[test]
    fn append_adds_markers_without_moving_the_camera() {
        let mut controller = controller();
        controller.replace_items(&[item("a", "126.978", "37.5665")]);
        let fits_before = controller
            .map
            .calls
            .iter()
            .filter(|c| matches!(c, MapCall::FitViewport(_)))
            .count();

        controller.append_items(&[item("b", "127.1", "37.4")]);
        let fits_after = controller
            .map
            .calls
            .iter()
            .filter(|c| matches!(c, MapCall::FitViewport(_)))
            .count();

        assert_eq!(controller.map.calls.last(), Some(&MapCall::AddMarkers(1)));
        assert_eq!(fits_before, fits_after);
    }
}
