use foundation::{LatLon, Time};
use serde::{Deserialize, Serialize};
use style::StyleDocument;

/// What a rendering surface is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSource {
    /// Remote vector style endpoint.
    Url(String),
    /// Inline style document (the bundled raster style).
    Document(StyleDocument),
}

/// A live map surface owned by the rendering engine.
///
/// Mutations are fire-and-forget: the engine may animate towards the new
/// value, and the core never waits for it.
pub trait RenderSurface {
    fn center(&self) -> LatLon;
    fn zoom(&self) -> f64;
    fn pitch(&self) -> f64;

    fn set_center(&mut self, center: LatLon);
    fn set_zoom(&mut self, zoom: f64);
    fn set_pitch(&mut self, pitch: f64);

    /// The loaded style, `None` while the engine is still loading it.
    fn style_mut(&mut self) -> Option<&mut StyleDocument>;

    /// Enable or disable the engine's built-in pinch and double-tap zoom.
    fn set_builtin_zoom_gestures(&mut self, enabled: bool);
}

pub trait SurfaceFactory {
    type Surface: RenderSurface;

    fn create_surface(&mut self, source: &StyleSource) -> Self::Surface;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotDetermined,
    AuthorizedWhenInUse,
    AuthorizedAlways,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    pub fn is_granted(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways
        )
    }

    pub fn is_refused(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted
        )
    }
}

pub trait LocationService {
    fn authorization_status(&self) -> AuthorizationStatus;
    fn request_authorization(&mut self);
    fn start_updates(&mut self);
    fn stop_updates(&mut self);
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub coordinate: LatLon,
    pub timestamp: Time,
}

impl LocationFix {
    pub fn new(coordinate: LatLon, timestamp: Time) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuthorizationStatus::*;

    #[test]
    fn status_classification_is_exclusive() {
        for status in [NotDetermined, AuthorizedWhenInUse, AuthorizedAlways, Denied, Restricted] {
            assert!(!(status.is_granted() && status.is_refused()));
        }
        assert!(!NotDetermined.is_granted());
        assert!(!NotDetermined.is_refused());
        assert!(AuthorizedAlways.is_granted());
        assert!(Restricted.is_refused());
    }
}
