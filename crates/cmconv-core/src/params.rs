//! Current parameter values for the active color model.

use serde::Serialize;

use crate::error::ConvertError;
use crate::registry::{ColorModelDefinition, ParameterSpec};

/// Key/value pairs for the active model, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSnapshot {
    entries: Vec<(&'static str, f64)>,
}

impl ParameterSnapshot {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry_key, _)| *entry_key == key)
            .map(|(_, value)| *value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutable parameter values, always shaped exactly like the active model's schema.
///
/// Values outside a spec's `[min, max]` are rejected, never clamped; input
/// controls clamp with [`ParameterSpec::quantize`] before calling [`ParameterStore::set`].
#[derive(Debug, Clone)]
pub struct ParameterStore {
    model: &'static ColorModelDefinition,
    values: Vec<f64>,
}

impl ParameterStore {
    /// A store holding `model`'s defaults.
    pub fn seeded(model: &'static ColorModelDefinition) -> Self {
        Self {
            model,
            values: defaults_for(model),
        }
    }

    /// Replace every entry with `model`'s defaults.
    pub fn reseed(&mut self, model: &'static ColorModelDefinition) {
        self.model = model;
        self.values = defaults_for(model);
        tracing::debug!(model = model.id, keys = self.values.len(), "parameters reseeded");
    }

    pub fn model_id(&self) -> &'static str {
        self.model.id
    }

    pub fn specs(&self) -> &'static [ParameterSpec] {
        self.model.parameters
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.position(key).map(|index| self.values[index])
    }

    pub fn set(&mut self, key: &str, value: f64) -> Result<(), ConvertError> {
        let index = self
            .position(key)
            .ok_or_else(|| ConvertError::UnknownParameter {
                model: self.model.id.to_string(),
                key: key.to_string(),
            })?;
        let spec = &self.model.parameters[index];
        if !spec.contains(value) {
            return Err(ConvertError::OutOfRange {
                key: key.to_string(),
                value,
                min: spec.min,
                max: spec.max,
            });
        }
        self.values[index] = value;
        Ok(())
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            entries: self
                .model
                .parameters
                .iter()
                .zip(&self.values)
                .map(|(spec, value)| (spec.key, *value))
                .collect(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.model.parameters.iter().position(|spec| spec.key == key)
    }
}

fn defaults_for(model: &ColorModelDefinition) -> Vec<f64> {
    model.parameters.iter().map(|spec| spec.default).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ColorModelRegistry;
    use std::collections::BTreeSet;

    fn model(id: &str) -> &'static ColorModelDefinition {
        ColorModelRegistry::builtin().get_model(id).unwrap()
    }

    #[test]
    fn test_reseed_key_set_matches_schema_for_every_model() {
        let mut store = ParameterStore::seeded(model("grayscale"));
        for definition in ColorModelRegistry::builtin().list_models() {
            store.reseed(definition);
            let keys: BTreeSet<_> = store.snapshot().keys().collect();
            let expected: BTreeSet<_> = definition.parameters.iter().map(|p| p.key).collect();
            assert_eq!(keys, expected, "key set for {}", definition.id);
        }
    }

    #[test]
    fn test_reseed_values_are_defaults() {
        let mut store = ParameterStore::seeded(model("grayscale"));
        for definition in ColorModelRegistry::builtin().list_models() {
            store.reseed(definition);
            let snapshot = store.snapshot();
            for spec in definition.parameters {
                assert_eq!(snapshot.get(spec.key), Some(spec.default));
            }
        }
    }

    #[test]
    fn test_switch_from_four_params_drops_stale_keys() {
        let mut store = ParameterStore::seeded(model("cmyk"));
        store.set("param4", 0.5).unwrap();
        store.reseed(model("srgb"));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("param4"), None);
        assert_eq!(snapshot.get("param1"), Some(1.0));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut store = ParameterStore::seeded(model("grayscale"));
        let err = store.set("param1", 1.5).unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { max, .. } if max == 1.0));
        assert_eq!(store.get("param1"), Some(0.299));
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut store = ParameterStore::seeded(model("hsv"));
        assert!(store.set("param2", f64::NAN).is_err());
        assert!(store.set("param2", f64::INFINITY).is_err());
        assert_eq!(store.get("param2"), Some(1.0));
    }

    #[test]
    fn test_set_accepts_bounds() {
        let mut store = ParameterStore::seeded(model("hsv"));
        store.set("param1", 0.0).unwrap();
        store.set("param2", 2.0).unwrap();
        assert_eq!(store.get("param1"), Some(0.0));
        assert_eq!(store.get("param2"), Some(2.0));
    }

    #[test]
    fn test_set_unknown_key() {
        let mut store = ParameterStore::seeded(model("srgb"));
        let err = store.set("param2", 1.0).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownParameter { .. }));
    }

    #[test]
    fn test_no_stored_value_escapes_bounds() {
        let mut store = ParameterStore::seeded(model("grayscale"));
        for definition in ColorModelRegistry::builtin().list_models() {
            store.reseed(definition);
            for spec in definition.parameters {
                for candidate in [spec.min - 1.0, spec.max + 0.5, spec.default, 1.5] {
                    let _ = store.set(spec.key, candidate);
                }
            }
            for (key, value) in store.snapshot().iter() {
                let spec = definition.parameter(key).unwrap();
                assert!(spec.contains(value), "{}.{key} = {value}", definition.id);
            }
        }
    }

    #[test]
    fn test_snapshot_preserves_schema_order() {
        let store = ParameterStore::seeded(model("cmyk"));
        let keys: Vec<_> = store.snapshot().keys().collect();
        assert_eq!(keys, vec!["param1", "param2", "param3", "param4"]);
    }
}
