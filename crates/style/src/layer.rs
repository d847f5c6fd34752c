use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layer type tag as written in the style document's `type` field.
///
/// Unrecognised types decode as [`LayerKind::Other`] so foreign styles still
/// load; they are never produced by this crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Background,
    Fill,
    Line,
    Symbol,
    Raster,
    Circle,
    FillExtrusion,
    Heatmap,
    Hillshade,
    #[serde(other)]
    Other,
}

impl LayerKind {
    /// Label layers are the ones drawn on top of everything else.
    pub fn is_label(self) -> bool {
        matches!(self, LayerKind::Symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "source-layer", default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub paint: Map<String, Value>,
    /// Everything else (`filter`, `metadata`, ...) is carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            source: None,
            source_layer: None,
            minzoom: None,
            maxzoom: None,
            layout: Map::new(),
            paint: Map::new(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerKind, StyleLayer};

    #[test]
    fn decodes_kebab_case_kinds() {
        let layer: StyleLayer = serde_json::from_str(
            r#"{"id":"b","type":"fill-extrusion","source":"v","source-layer":"building"}"#,
        )
        .unwrap();
        assert_eq!(layer.kind, LayerKind::FillExtrusion);
        assert_eq!(layer.source_layer.as_deref(), Some("building"));
    }

    #[test]
    fn unknown_kinds_decode_as_other() {
        let layer: StyleLayer = serde_json::from_str(r#"{"id":"s","type":"sky"}"#).unwrap();
        assert_eq!(layer.kind, LayerKind::Other);
    }

    #[test]
    fn carries_unmodelled_fields() {
        let layer: StyleLayer = serde_json::from_str(
            r#"{"id":"w","type":"fill","filter":["==","class","lake"]}"#,
        )
        .unwrap();
        assert!(layer.extra.contains_key("filter"));
        let back = serde_json::to_value(&layer).unwrap();
        assert_eq!(back["filter"][1], "class");
    }
}
