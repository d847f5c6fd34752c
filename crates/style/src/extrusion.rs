use serde_json::json;

use crate::layer::{LayerKind, StyleLayer};

/// Identifier a vector style uses when it already ships 3D buildings.
pub const NATIVE_3D_LAYER_ID: &str = "building-3d";
/// Identifier of the extrusion layer synthesized when the style has none.
pub const SYNTHESIZED_3D_LAYER_ID: &str = "mapview-3d-buildings";
/// Sub-layer of the vector source carrying building footprints.
pub const BUILDING_SOURCE_LAYER: &str = "building";

pub const EXTRUSION_MIN_ZOOM: f64 = 14.0;
pub const EXTRUSION_OPACITY: f64 = 0.8;
/// Warm gray.
pub const EXTRUSION_COLOR: &str = "#c9c0b5";

/// Per-feature attributes supplied by the vector tiles.
pub const RENDER_HEIGHT_FIELD: &str = "render_height";
pub const RENDER_MIN_HEIGHT_FIELD: &str = "render_min_height";

/// Builds the building extrusion layer for `source_id`.
pub fn building_extrusion_layer(source_id: &str) -> StyleLayer {
    let mut layer = StyleLayer::new(SYNTHESIZED_3D_LAYER_ID, LayerKind::FillExtrusion);
    layer.source = Some(source_id.to_string());
    layer.source_layer = Some(BUILDING_SOURCE_LAYER.to_string());
    layer.minzoom = Some(EXTRUSION_MIN_ZOOM);
    layer
        .paint
        .insert("fill-extrusion-color".into(), json!(EXTRUSION_COLOR));
    layer
        .paint
        .insert("fill-extrusion-opacity".into(), json!(EXTRUSION_OPACITY));
    layer.paint.insert(
        "fill-extrusion-height".into(),
        json!(["get", RENDER_HEIGHT_FIELD]),
    );
    layer.paint.insert(
        "fill-extrusion-base".into(),
        json!(["get", RENDER_MIN_HEIGHT_FIELD]),
    );
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn layer_matches_the_building_contract() {
        let layer = building_extrusion_layer("openmaptiles");
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "mapview-3d-buildings",
                "type": "fill-extrusion",
                "source": "openmaptiles",
                "source-layer": "building",
                "minzoom": 14.0,
                "paint": {
                    "fill-extrusion-color": "#c9c0b5",
                    "fill-extrusion-opacity": 0.8,
                    "fill-extrusion-height": ["get", "render_height"],
                    "fill-extrusion-base": ["get", "render_min_height"]
                }
            })
        );
    }
}
