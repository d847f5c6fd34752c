use std::collections::BTreeMap;

use foundation::LatLon;
use serde::Serialize;
use style::StyleDocument;

use crate::engine::{AuthorizationStatus, LocationService, RenderSurface, StyleSource, SurfaceFactory};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceCall {
    SetCenter(LatLon),
    SetZoom(f64),
    SetPitch(f64),
    SetBuiltinZoomGestures(bool),
}

#[derive(Debug, Clone)]
pub struct SimSurface {
    source: StyleSource,
    center: LatLon,
    zoom: f64,
    pitch: f64,
    style: Option<StyleDocument>,
    builtin_zoom_gestures: bool,
    calls: Vec<SurfaceCall>,
}

impl SimSurface {
    pub fn new(source: StyleSource, style: Option<StyleDocument>) -> Self {
        Self {
            source,
            center: LatLon::default(),
            zoom: 1.0,
            pitch: 0.0,
            style,
            builtin_zoom_gestures: true,
            calls: Vec::new(),
        }
    }

    pub fn source(&self) -> &StyleSource {
        &self.source
    }

    pub fn style(&self) -> Option<&StyleDocument> {
        self.style.as_ref()
    }

    pub fn builtin_zoom_gestures(&self) -> bool {
        self.builtin_zoom_gestures
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of center/zoom/pitch writes issued so far.
    pub fn viewport_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| !matches!(c, SurfaceCall::SetBuiltinZoomGestures(_)))
            .count()
    }

    /// Move the camera the way a user's drag or pinch would: engine-side,
    /// without going through the mutation API.
    pub fn simulate_region(&mut self, center: LatLon, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    /// Reset the camera pitch engine-side, as a style load can.
    pub fn simulate_pitch(&mut self, pitch: f64) {
        self.pitch = pitch;
    }
}

impl RenderSurface for SimSurface {
    fn center(&self) -> LatLon {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn pitch(&self) -> f64 {
        self.pitch
    }

    fn set_center(&mut self, center: LatLon) {
        self.calls.push(SurfaceCall::SetCenter(center));
        self.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.calls.push(SurfaceCall::SetZoom(zoom));
        self.zoom = zoom;
    }

    fn set_pitch(&mut self, pitch: f64) {
        self.calls.push(SurfaceCall::SetPitch(pitch));
        self.pitch = pitch;
    }

    fn style_mut(&mut self) -> Option<&mut StyleDocument> {
        self.style.as_mut()
    }

    fn set_builtin_zoom_gestures(&mut self, enabled: bool) {
        self.calls.push(SurfaceCall::SetBuiltinZoomGestures(enabled));
        self.builtin_zoom_gestures = enabled;
    }
}

/// Creates [`SimSurface`]s, resolving remote styles from an in-memory table.
///
/// A URL with no entry in the table produces a surface whose style never
/// loads.
#[derive(Debug, Default)]
pub struct SimSurfaceFactory {
    styles_by_url: BTreeMap<String, StyleDocument>,
    created: usize,
}

impl SimSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, url: impl Into<String>, doc: StyleDocument) -> Self {
        self.styles_by_url.insert(url.into(), doc);
        self
    }

    pub fn created(&self) -> usize {
        self.created
    }
}

impl SurfaceFactory for SimSurfaceFactory {
    type Surface = SimSurface;

    fn create_surface(&mut self, source: &StyleSource) -> SimSurface {
        self.created += 1;
        let style = match source {
            StyleSource::Url(url) => self.styles_by_url.get(url).cloned(),
            StyleSource::Document(doc) => Some(doc.clone()),
        };
        SimSurface::new(source.clone(), style)
    }
}

#[derive(Debug, Clone)]
pub struct SimLocation {
    status: AuthorizationStatus,
    authorization_requests: usize,
    start_calls: usize,
    stop_calls: usize,
    updating: bool,
}

impl SimLocation {
    pub fn new(status: AuthorizationStatus) -> Self {
        Self {
            status,
            authorization_requests: 0,
            start_calls: 0,
            stop_calls: 0,
            updating: false,
        }
    }

    /// Change the status the way the platform would after a prompt.
    pub fn set_status(&mut self, status: AuthorizationStatus) {
        self.status = status;
    }

    pub fn authorization_requests(&self) -> usize {
        self.authorization_requests
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }
}

impl LocationService for SimLocation {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn request_authorization(&mut self) {
        self.authorization_requests += 1;
    }

    fn start_updates(&mut self) {
        self.start_calls += 1;
        self.updating = true;
    }

    fn stop_updates(&mut self) {
        self.stop_calls += 1;
        self.updating = false;
    }
}
