//! Bounded social attributes — "How others see me".
//!
//! Every attribute maps actors to a scalar in `[-1.0, 1.0]`. Actors that
//! were never adjusted read as the attribute's default.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Lower bound of every social attribute.
pub const ATTRIBUTE_MIN: f32 = -1.0;
/// Upper bound of every social attribute.
pub const ATTRIBUTE_MAX: f32 = 1.0;

/// A single named social dimension (friendship, respect, fear, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    default: f32,
    values: HashMap<String, f32>,
}

impl Attribute {
    /// Create an attribute whose unseen actors read as `default`.
    #[must_use]
    pub fn new(name: impl Into<String>, default: f32) -> Self {
        Self {
            name: name.into(),
            default: default.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX),
            values: HashMap::new(),
        }
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value read for actors that were never adjusted.
    #[must_use]
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Current value for `actor`, or the default if unseen.
    #[must_use]
    pub fn get(&self, actor: &str) -> f32 {
        self.values.get(actor).copied().unwrap_or(self.default)
    }

    /// Shift `actor`'s value by `delta`, clamping into `[-1, 1]`.
    pub fn adjust(&mut self, actor: &str, delta: f32) {
        let value = (self.get(actor) + delta).clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
        self.values.insert(actor.to_string(), value);
    }

    /// Overwrite `actor`'s value, clamping into `[-1, 1]`.
    pub fn set(&mut self, actor: &str, value: f32) {
        self.values
            .insert(actor.to_string(), value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX));
    }
}

/// All attributes owned by one social network, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeStore {
    attributes: BTreeMap<String, Attribute>,
}

impl AttributeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store registering `names`, each with the same default.
    #[must_use]
    pub fn with_attributes<I, S>(names: I, default: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for name in names {
            store.register(Attribute::new(name, default));
        }
        store
    }

    /// Register (or replace) an attribute.
    pub fn register(&mut self, attribute: Attribute) {
        self.attributes.insert(attribute.name.clone(), attribute);
    }

    /// Whether an attribute with this name is registered.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Registered attribute names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Value of `attribute` for `actor`. Unknown attributes read as `0.0`.
    #[must_use]
    pub fn get(&self, attribute: &str, actor: &str) -> f32 {
        self.attributes
            .get(attribute)
            .map_or(0.0, |attr| attr.get(actor))
    }

    /// Shift `attribute` for `actor` by `delta`.
    ///
    /// Adjusting an unregistered attribute is a caller error and is ignored.
    pub fn adjust(&mut self, attribute: &str, actor: &str, delta: f32) {
        match self.attributes.get_mut(attribute) {
            Some(attr) => attr.adjust(actor, delta),
            None => tracing::debug!(attribute, actor, "adjust on unregistered attribute ignored"),
        }
    }

    /// Overwrite `attribute` for `actor`. Ignored for unregistered attributes.
    pub fn set(&mut self, attribute: &str, actor: &str, value: f32) {
        if let Some(attr) = self.attributes.get_mut(attribute) {
            attr.set(actor, value);
        }
    }
}
