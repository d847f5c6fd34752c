use serde_json::{Value, json};

use crate::document::StyleDocument;

/// Layout property holding a label layer's text expression.
pub const TEXT_FIELD: &str = "text-field";
/// Feature attribute carrying the default (local-script) name.
pub const DEFAULT_NAME_FIELD: &str = "name";

/// Expression preferring `name:<language>` and falling back to `name`.
pub fn localized_name_expression(language: &str) -> Value {
    let language = language.trim();
    if language.is_empty() {
        return json!(["get", DEFAULT_NAME_FIELD]);
    }
    json!([
        "coalesce",
        ["get", format!("{DEFAULT_NAME_FIELD}:{language}")],
        ["get", DEFAULT_NAME_FIELD]
    ])
}

/// Rewrite the text expression of every label layer to the localized one.
///
/// Returns the number of layers whose expression actually changed, so a
/// second pass over the same document reports zero.
pub fn localize_labels(doc: &mut StyleDocument, language: &str) -> usize {
    let expr = localized_name_expression(language);
    let mut changed = 0usize;
    for layer in doc.layers.iter_mut().filter(|l| l.kind.is_label()) {
        let Some(current) = layer.layout.get_mut(TEXT_FIELD) else {
            continue;
        };
        if *current == expr {
            continue;
        }
        *current = expr.clone();
        changed += 1;
    }
    changed
}
