use serde::{Deserialize, Serialize};

/// Pitch used for the extruded 3D presentation (degrees).
pub const PITCH_3D: f64 = 45.0;
/// Pitch used for every flat presentation (degrees).
pub const PITCH_FLAT: f64 = 0.0;

/// Which kind of style the rendering surface is built from.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleMode {
    #[default]
    Raster,
    VectorFlat,
    #[serde(rename = "vector-3d")]
    Vector3D,
}

impl StyleMode {
    pub fn is_vector(self) -> bool {
        !matches!(self, StyleMode::Raster)
    }

    /// Camera pitch this mode requires.
    pub fn required_pitch(self) -> f64 {
        match self {
            StyleMode::Vector3D => PITCH_3D,
            StyleMode::Raster | StyleMode::VectorFlat => PITCH_FLAT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleMode::Raster => "raster",
            StyleMode::VectorFlat => "vector-flat",
            StyleMode::Vector3D => "vector-3d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raster" => Some(StyleMode::Raster),
            "vector-flat" | "vector" | "flat" => Some(StyleMode::VectorFlat),
            "vector-3d" | "3d" => Some(StyleMode::Vector3D),
            _ => None,
        }
    }
}

impl std::fmt::Display for StyleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::StyleMode;

    #[test]
    fn pitch_follows_mode() {
        assert_eq!(StyleMode::Raster.required_pitch(), 0.0);
        assert_eq!(StyleMode::VectorFlat.required_pitch(), 0.0);
        assert_eq!(StyleMode::Vector3D.required_pitch(), 45.0);
    }

    #[test]
    fn parse_accepts_canonical_names_and_aliases() {
        for mode in [StyleMode::Raster, StyleMode::VectorFlat, StyleMode::Vector3D] {
            assert_eq!(StyleMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(StyleMode::parse(" 3D "), Some(StyleMode::Vector3D));
        assert_eq!(StyleMode::parse("satellite"), None);
    }

    #[test]
    fn serde_names_match_as_str() {
        let json = serde_json::to_string(&StyleMode::Vector3D).unwrap();
        assert_eq!(json, "\"vector-3d\"");
    }
}
