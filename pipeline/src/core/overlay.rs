//! Layered configuration merges.
//!
//! All merges are pure: they take immutable snapshots and return a new
//! mapping, with keys from later layers replacing keys from earlier ones.

use serde_json::Value;

use crate::core::types::ConfigMap;

/// Settings layers for a stage input, lowest priority first.
#[derive(Debug, Clone, Copy)]
pub struct StageInputLayers<'a> {
    pub tools: &'a ConfigMap,
    pub databases: &'a ConfigMap,
    pub stage: &'a ConfigMap,
    pub global: &'a ConfigMap,
}

/// Merge `layers` left to right; later layers win on key collision.
pub fn layer(layers: &[&ConfigMap]) -> ConfigMap {
    let mut merged = ConfigMap::new();
    for settings in layers {
        for (key, value) in settings.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Build the input configuration for one stage.
///
/// Global state overrides stage-local settings so downstream stages see
/// upstream results. `prefix` is always the stage's own output prefix.
pub fn stage_input(layers: StageInputLayers<'_>, stage_prefix: &str) -> ConfigMap {
    let mut input = layer(&[layers.tools, layers.databases, layers.stage, layers.global]);
    input.insert("prefix".to_string(), Value::String(stage_prefix.to_string()));
    input
}

/// Prepend `key_prefix` to every key of a stage output.
pub fn apply_key_prefix(output: ConfigMap, key_prefix: Option<&str>) -> ConfigMap {
    match key_prefix {
        Some(key_prefix) => output
            .into_iter()
            .map(|(key, value)| (format!("{key_prefix}{key}"), value))
            .collect(),
        None => output,
    }
}

/// Merge a stage output on top of the global state.
pub fn merge_state(state: &ConfigMap, output: &ConfigMap) -> ConfigMap {
    layer(&[state, output])
}
