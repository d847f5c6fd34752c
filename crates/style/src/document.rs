use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layer::StyleLayer;

/// Style shipped with the app, used whenever no vector style can be loaded.
pub const BUNDLED_RASTER_STYLE: &str = include_str!("../assets/raster-style.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    Parse(String),
    Encode(String),
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::Parse(msg) => write!(f, "style document parse error: {msg}"),
            StyleError::Encode(msg) => write!(f, "style document encode error: {msg}"),
        }
    }
}

impl std::error::Error for StyleError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Vector,
    Raster,
    RasterDem,
    Geojson,
    Image,
    Video,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A declarative style: named sources plus a layer stack.
///
/// `layers` is ordered bottom to top: the last layer draws over everything
/// before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDocument {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, Source>,
    #[serde(default)]
    pub layers: Vec<StyleLayer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StyleDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: 8,
            name: Some(name.into()),
            sources: BTreeMap::new(),
            layers: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        serde_json::from_str(json).map_err(|e| StyleError::Parse(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, StyleError> {
        serde_json::to_string_pretty(self).map_err(|e| StyleError::Encode(e.to_string()))
    }

    /// The raster style compiled into the binary.
    pub fn bundled_raster() -> Result<Self, StyleError> {
        Self::from_json(BUNDLED_RASTER_STYLE)
    }

    /// Short content hash identifying this exact style instance in logs.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let hex = blake3::hash(&bytes).to_hex();
        hex.as_str()[..16].to_string()
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }
}
