use crate::document::{Source, SourceKind, StyleDocument};
use crate::layer::{LayerKind, StyleLayer};

/// Position of a layer in the stack at the time it was looked up.
///
/// Handles are invalidated by any insertion into the stack; resolve them
/// again after mutating.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerHandle {
    index: usize,
    kind: LayerKind,
}

impl LayerHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }
}

impl StyleDocument {
    pub fn lookup_layer(&self, kind: LayerKind, id: &str) -> Option<LayerHandle> {
        self.layers
            .iter()
            .position(|l| l.kind == kind && l.id == id)
            .map(|index| LayerHandle { index, kind })
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&StyleLayer> {
        self.layers.get(handle.index).filter(|l| l.kind == handle.kind)
    }

    /// Highest layer in the stack with the given kind.
    pub fn topmost_layer(&self, kind: LayerKind) -> Option<LayerHandle> {
        self.layers
            .iter()
            .rposition(|l| l.kind == kind)
            .map(|index| LayerHandle { index, kind })
    }

    pub fn lookup_source(&self, kind: SourceKind, id: &str) -> Option<&Source> {
        self.sources.get(id).filter(|s| s.kind == kind)
    }

    /// Insert `layer` directly beneath the layer `below`.
    pub fn insert_layer_below(&mut self, below: LayerHandle, layer: StyleLayer) -> LayerHandle {
        let kind = layer.kind;
        let index = below.index.min(self.layers.len());
        self.layers.insert(index, layer);
        LayerHandle { index, kind }
    }

    /// Append `layer` at the top of the stack.
    pub fn push_layer(&mut self, layer: StyleLayer) -> LayerHandle {
        let kind = layer.kind;
        self.layers.push(layer);
        LayerHandle {
            index: self.layers.len() - 1,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Source, SourceKind, StyleDocument};
    use crate::layer::{LayerKind, StyleLayer};

    fn doc() -> StyleDocument {
        let mut doc = StyleDocument::new("t");
        doc.sources
            .insert("v".into(), Source::new(SourceKind::Vector).with("url", "https://x"));
        doc.layers.push(StyleLayer::new("water", LayerKind::Fill));
        doc.layers.push(StyleLayer::new("road-label", LayerKind::Symbol));
        doc.layers.push(StyleLayer::new("roads", LayerKind::Line));
        doc.layers.push(StyleLayer::new("place-label", LayerKind::Symbol));
        doc
    }

    #[test]
    fn lookup_requires_matching_kind() {
        let doc = doc();
        assert!(doc.lookup_layer(LayerKind::Fill, "water").is_some());
        assert!(doc.lookup_layer(LayerKind::Line, "water").is_none());
        assert!(doc.lookup_layer(LayerKind::Fill, "missing").is_none());
    }

    #[test]
    fn topmost_picks_highest_index() {
        let doc = doc();
        let top = doc.topmost_layer(LayerKind::Symbol).unwrap();
        assert_eq!(top.index(), 3);
        assert_eq!(doc.layer(top).unwrap().id, "place-label");
        assert!(doc.topmost_layer(LayerKind::FillExtrusion).is_none());
    }

    #[test]
    fn insert_below_shifts_target_up() {
        let mut doc = doc();
        let top = doc.topmost_layer(LayerKind::Symbol).unwrap();
        doc.insert_layer_below(top, StyleLayer::new("b", LayerKind::FillExtrusion));
        assert_eq!(doc.layer_ids(), vec!["water", "road-label", "roads", "b", "place-label"]);
    }

    #[test]
    fn source_lookup_is_typed() {
        let doc = doc();
        assert!(doc.lookup_source(SourceKind::Vector, "v").is_some());
        assert!(doc.lookup_source(SourceKind::Raster, "v").is_none());
    }

    #[test]
    fn stale_handle_with_wrong_kind_resolves_to_none() {
        let mut doc = doc();
        let water = doc.lookup_layer(LayerKind::Fill, "water").unwrap();
        doc.layers.insert(0, StyleLayer::new("bg", LayerKind::Background));
        assert!(doc.layer(water).is_none());
    }
}
