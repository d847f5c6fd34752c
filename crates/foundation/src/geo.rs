use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Component-wise comparison within `eps` degrees.
    pub fn approx_eq(&self, other: LatLon, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lon - other.lon).abs() <= eps
    }
}

impl Default for LatLon {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::LatLon;

    #[test]
    fn approx_eq_respects_epsilon() {
        let a = LatLon::new(52.52, 13.405);
        assert!(a.approx_eq(LatLon::new(52.520_000_5, 13.405), 1e-6));
        assert!(!a.approx_eq(LatLon::new(52.520_01, 13.405), 1e-6));
    }

    #[test]
    fn validity_rejects_out_of_range() {
        assert!(LatLon::new(0.0, 0.0).is_valid());
        assert!(!LatLon::new(91.0, 0.0).is_valid());
        assert!(!LatLon::new(0.0, -181.0).is_valid());
        assert!(!LatLon::new(f64::NAN, 0.0).is_valid());
    }
}
