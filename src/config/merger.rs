//! Layering of YAML configuration files.
//!
//! # Merge Rules
//!
//! - Mappings merge recursively
//! - Sequences are replaced entirely
//! - `null` in a later layer removes the key
//! - Scalars in a later layer replace earlier ones

use serde_yaml::Value;

/// Overlay `overlay` onto `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    result.remove(key);
                    continue;
                }
                let merged = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Mapping(result)
        }
        // An empty file parses as null and contributes nothing.
        (base, Value::Null) => base.clone(),
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order; later layers win.
pub fn merge_layers(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}
