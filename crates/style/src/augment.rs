use foundation::Generation;
use serde::Serialize;
use tracing::{debug, info};

use crate::document::{SourceKind, StyleDocument};
use crate::extrusion::{NATIVE_3D_LAYER_ID, SYNTHESIZED_3D_LAYER_ID, building_extrusion_layer};
use crate::labels::localize_labels;
use crate::layer::LayerKind;
use crate::mode::StyleMode;

/// Well-known identifier of the vector tile source in supported styles.
pub const DEFAULT_VECTOR_SOURCE_ID: &str = "openmaptiles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentConfig {
    pub vector_source_id: String,
    pub language: String,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            vector_source_id: DEFAULT_VECTOR_SOURCE_ID.to_string(),
            language: "en".to_string(),
        }
    }
}

/// Identity of the synthesized extrusion layer within one style load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AugmentedLayer {
    pub generation: Generation,
    pub layer_id: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RasterMode,
    MissingVectorSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrusionOutcome {
    NotRequested,
    /// The style ships its own 3D buildings.
    ReusedNative,
    Synthesized(AugmentedLayer),
    /// A duplicate load notification; the earlier layer is still in place.
    AlreadyPresent(AugmentedLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentReport {
    pub skipped: Option<SkipReason>,
    pub localized_layers: usize,
    pub extrusion: ExtrusionOutcome,
    /// Pitch the camera must be brought to, if any.
    pub target_pitch: Option<f64>,
}

impl AugmentReport {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            localized_layers: 0,
            extrusion: ExtrusionOutcome::NotRequested,
            target_pitch: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct StyleAugmenter {
    config: AugmentConfig,
    augmented: Option<AugmentedLayer>,
}

impl StyleAugmenter {
    pub fn new(config: AugmentConfig) -> Self {
        Self {
            config,
            augmented: None,
        }
    }

    /// Token of the layer synthesized for the current style, if any.
    pub fn augmented(&self) -> Option<&AugmentedLayer> {
        self.augmented.as_ref()
    }

    /// Forget the previous style's layer; called when the surface is recreated.
    pub fn reset(&mut self) {
        self.augmented = None;
    }

    pub fn augment(
        &mut self,
        doc: &mut StyleDocument,
        mode: StyleMode,
        generation: Generation,
    ) -> AugmentReport {
        if !mode.is_vector() {
            return AugmentReport::skipped(SkipReason::RasterMode);
        }

        let source_id = self.config.vector_source_id.as_str();
        if doc.lookup_source(SourceKind::Vector, source_id).is_none() {
            debug!(source_id, "vector source absent; skipping style augmentation");
            return AugmentReport::skipped(SkipReason::MissingVectorSource);
        }

        let localized_layers = localize_labels(doc, &self.config.language);

        let extrusion = match mode {
            StyleMode::Vector3D => self.ensure_extrusion(doc, generation),
            StyleMode::Raster | StyleMode::VectorFlat => ExtrusionOutcome::NotRequested,
        };

        info!(
            %mode,
            %generation,
            fingerprint = %doc.fingerprint(),
            localized_layers,
            ?extrusion,
            "style augmented"
        );

        AugmentReport {
            skipped: None,
            localized_layers,
            extrusion,
            target_pitch: Some(mode.required_pitch()),
        }
    }

    fn ensure_extrusion(&mut self, doc: &mut StyleDocument, generation: Generation) -> ExtrusionOutcome {
        if doc
            .lookup_layer(LayerKind::FillExtrusion, NATIVE_3D_LAYER_ID)
            .is_some()
        {
            return ExtrusionOutcome::ReusedNative;
        }

        if doc
            .lookup_layer(LayerKind::FillExtrusion, SYNTHESIZED_3D_LAYER_ID)
            .is_some()
        {
            let token = match &self.augmented {
                Some(token) if token.generation == generation => token.clone(),
                _ => {
                    let token = AugmentedLayer {
                        generation,
                        layer_id: SYNTHESIZED_3D_LAYER_ID.to_string(),
                    };
                    self.augmented = Some(token.clone());
                    token
                }
            };
            return ExtrusionOutcome::AlreadyPresent(token);
        }

        let layer = building_extrusion_layer(&self.config.vector_source_id);
        let handle = match doc.topmost_layer(LayerKind::Symbol) {
            Some(top_label) => doc.insert_layer_below(top_label, layer),
            None => doc.push_layer(layer),
        };
        debug!(index = handle.index(), kind = ?handle.kind(), "extrusion layer inserted");

        let token = AugmentedLayer {
            generation,
            layer_id: SYNTHESIZED_3D_LAYER_ID.to_string(),
        };
        self.augmented = Some(token.clone());
        ExtrusionOutcome::Synthesized(token)
    }
}
