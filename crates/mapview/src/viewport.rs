//! Viewport reconciliation between the controller and the rendering engine.
//!
//! Both sides write the same camera. Ownership is decided per reconciliation
//! pass: the engine owns center and zoom while a user gesture is active, the
//! controller owns them otherwise. Pitch is mode-driven and always belongs to
//! the controller.

use foundation::{COORD_EPSILON, LatLon, ZOOM_EPSILON, approx_eq, clamp_finite};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::engine::RenderSurface;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 20.0;
pub const MIN_PITCH: f64 = 0.0;
pub const MAX_PITCH: f64 = 60.0;

/// Zoom change applied by a single zoom-in/zoom-out intent.
pub const ZOOM_STEP: f64 = 1.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    clamp_finite(zoom, MIN_ZOOM, MAX_ZOOM)
}

pub fn clamp_pitch(pitch: f64) -> f64 {
    clamp_finite(pitch, MIN_PITCH, MAX_PITCH)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: f64,
    pub pitch: f64,
}

impl Viewport {
    pub fn new(center: LatLon, zoom: f64, pitch: f64) -> Self {
        Self {
            center,
            zoom: clamp_zoom(zoom),
            pitch: clamp_pitch(pitch),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLon::default(), 2.0, 0.0)
    }
}

/// Partial viewport update; `None` fields are left as they are.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewportTarget {
    pub center: Option<LatLon>,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
}

impl ViewportTarget {
    pub fn center(center: LatLon) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }

    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom: Some(zoom),
            ..Self::default()
        }
    }

    pub fn pitch(pitch: f64) -> Self {
        Self {
            pitch: Some(pitch),
            ..Self::default()
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }
}

/// Who may write center/zoom during the current pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Engine,
    Controller,
}

/// What a [`ViewportReconciler::set_target`] call did to the engine.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub center_written: bool,
    pub zoom_written: bool,
    pub pitch_written: bool,
    /// Center/zoom were requested but the engine owned the viewport.
    pub dropped: bool,
}

impl ApplyReport {
    pub fn wrote_anything(&self) -> bool {
        self.center_written || self.zoom_written || self.pitch_written
    }
}

#[derive(Debug, Clone)]
pub struct ViewportReconciler {
    canonical: Viewport,
    gesture_active: bool,
    owner: Owner,
}

impl ViewportReconciler {
    pub fn new(initial: Viewport) -> Self {
        Self {
            canonical: initial,
            gesture_active: false,
            owner: Owner::Controller,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.canonical
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Start a reconciliation pass; ownership is fixed from gesture activity.
    pub fn begin_pass(&mut self) -> Owner {
        self.owner = if self.gesture_active {
            Owner::Engine
        } else {
            Owner::Controller
        };
        self.owner
    }

    /// The engine reported the start of a user gesture; it owns the camera
    /// from this point on.
    pub fn gesture_started(&mut self) {
        self.gesture_active = true;
        self.owner = Owner::Engine;
    }

    /// The gesture ended: take over wherever the user left the camera.
    ///
    /// The engine stays owner for the remainder of this pass.
    pub fn gesture_ended<S: RenderSurface>(&mut self, surface: &S) {
        self.absorb(surface.center(), surface.zoom());
        self.gesture_active = false;
    }

    /// Adopt the engine's reported center and zoom exactly.
    pub fn absorb(&mut self, center: LatLon, zoom: f64) {
        trace!(lat = center.lat, lon = center.lon, zoom, "absorbing engine viewport");
        self.canonical.center = center;
        self.canonical.zoom = zoom;
    }

    /// Forget gesture state; used when the surface it belonged to is gone.
    pub fn reset_gesture(&mut self) {
        self.gesture_active = false;
        self.owner = Owner::Controller;
    }

    pub fn set_target<S: RenderSurface>(&mut self, surface: &mut S, target: ViewportTarget) -> ApplyReport {
        let mut report = ApplyReport::default();

        if target.center.is_some() || target.zoom.is_some() {
            if self.owner == Owner::Engine || self.gesture_active {
                debug!(?target, "engine owns the viewport; dropping center/zoom write");
                report.dropped = true;
            } else {
                if let Some(center) = target.center {
                    report.center_written = self.write_center(surface, center);
                }
                if let Some(zoom) = target.zoom {
                    report.zoom_written = self.write_zoom(surface, zoom);
                }
            }
        }

        if let Some(pitch) = target.pitch {
            report.pitch_written = self.ensure_pitch(surface, pitch);
        }

        report
    }

    /// Step zoom by `delta`, saturating at the zoom bounds.
    pub fn step_zoom<S: RenderSurface>(&mut self, surface: &mut S, delta: f64) -> ApplyReport {
        let zoom = clamp_zoom(self.canonical.zoom + delta);
        self.set_target(surface, ViewportTarget::zoom(zoom))
    }

    /// Bring the engine's pitch to `pitch` unless it is already there.
    ///
    /// Applied regardless of gesture activity.
    pub fn ensure_pitch<S: RenderSurface>(&mut self, surface: &mut S, pitch: f64) -> bool {
        let pitch = clamp_pitch(pitch);
        self.canonical.pitch = pitch;
        if approx_eq(surface.pitch(), pitch, ZOOM_EPSILON) {
            return false;
        }
        surface.set_pitch(pitch);
        true
    }

    /// Push the whole canonical viewport into a freshly created surface.
    pub fn push_all<S: RenderSurface>(&mut self, surface: &mut S, pitch: f64) {
        let v = self.canonical;
        surface.set_center(v.center);
        surface.set_zoom(clamp_zoom(v.zoom));
        self.canonical.zoom = clamp_zoom(v.zoom);
        self.ensure_pitch(surface, pitch);
    }

    fn write_center<S: RenderSurface>(&mut self, surface: &mut S, center: LatLon) -> bool {
        if !center.is_valid() {
            debug!(?center, "ignoring invalid center");
            return false;
        }
        if self.canonical.center.approx_eq(center, COORD_EPSILON) {
            return false;
        }
        surface.set_center(center);
        self.canonical.center = center;
        true
    }

    fn write_zoom<S: RenderSurface>(&mut self, surface: &mut S, zoom: f64) -> bool {
        let zoom = clamp_zoom(zoom);
        if approx_eq(self.canonical.zoom, zoom, ZOOM_EPSILON) {
            return false;
        }
        surface.set_zoom(zoom);
        self.canonical.zoom = zoom;
        true
    }
}
