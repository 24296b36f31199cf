use crate::{DynSvc, Injectable, Property, Service, Svc};
use std::{
    collections::BTreeMap,
    fmt::{Debug, Formatter},
};

/// A bag of named properties. Object-shaped argument specifications fill one
/// of these, and factories may return one with deferred properties that get
/// injected like any other value.
///
/// ```
/// use named_injector::{Object, Property};
///
/// let object = Object::new().with("arg2", "baz");
/// assert!(object.contains_key("arg2"));
/// assert_eq!(Some("baz"), object.get_cloned::<&'static str>("arg2"));
/// ```
#[derive(Clone, Default)]
pub struct Object {
    properties: BTreeMap<String, Property>,
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Object::default()
    }

    /// Sets a property to a value, returning the object for chaining.
    #[must_use]
    pub fn with<T: Service>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, Property::value(value));
        self
    }

    /// Sets a property, returning what was there before.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        property: impl Into<Property>,
    ) -> Option<Property> {
        self.properties.insert(key.into(), property.into())
    }

    /// Sets a property to an already shared value, or to nothing.
    pub fn insert_dyn(
        &mut self,
        key: impl Into<String>,
        value: Option<DynSvc>,
    ) -> Option<Property> {
        self.properties
            .insert(key.into(), Property::Resolved(value))
    }

    /// Whether the object has its own property under this key, even one that
    /// holds nothing.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Gets a property slot.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Gets a property's resolved value.
    #[must_use]
    pub fn get_dyn(&self, key: &str) -> Option<&DynSvc> {
        self.property(key).and_then(Property::get_dyn)
    }

    /// Gets a property's resolved value as a pointer to a concrete type.
    #[must_use]
    pub fn get<T: Service>(&self, key: &str) -> Option<Svc<T>> {
        self.property(key).and_then(Property::get)
    }

    /// Gets a copy of a property's resolved value.
    #[must_use]
    pub fn get_cloned<T: Service + Clone>(&self, key: &str) -> Option<T> {
        self.property(key).and_then(Property::get_cloned)
    }

    /// Iterates over the property names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Injectable for Object {
    fn properties(&mut self) -> Vec<(&str, &mut Property)> {
        self.properties
            .iter_mut()
            .map(|(key, property)| (key.as_str(), property))
            .collect()
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.properties.iter()).finish()
    }
}
