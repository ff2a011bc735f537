//! Field value lookup on the two kinds of resolver root.
//!
//! A resolver's parent is either a raw mapping (a group value, a repeater
//! row, a map value) keyed by field key, or a [`DomainRef`] whose values live
//! in the [`FieldValueStore`]. The root is inspected once and wrapped in a
//! [`ValueSource`]; strategies only talk to that capability.

use async_graphql::dynamic::FieldValue;
use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};
use async_trait::async_trait;

use super::DomainRef;
use crate::store::{FieldValueStore, ValueFormat};

/// Read access to the field values of one root.
#[async_trait]
pub trait ValueSource: Send + Sync {
    /// Machine value of a field, `None` when absent.
    async fn try_get_raw(&self, key: &str) -> Option<Value>;

    /// Display value of a field; only roots with an identity have one.
    async fn get_formatted(&self, key: &str) -> Option<Value>;
}

/// Root backed by a raw key/value mapping.
pub struct MappingSource<'a> {
    map: &'a IndexMap<Name, Value>,
}

impl<'a> MappingSource<'a> {
    pub fn new(map: &'a IndexMap<Name, Value>) -> Self {
        Self { map }
    }
}

#[async_trait]
impl<'a> ValueSource for MappingSource<'a> {
    async fn try_get_raw(&self, key: &str) -> Option<Value> {
        match self.map.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value.clone()),
        }
    }

    async fn get_formatted(&self, _key: &str) -> Option<Value> {
        None
    }
}

/// Root backed by a domain object and the value store.
pub struct ObjectSource<'a> {
    object: &'a DomainRef,
    store: &'a dyn FieldValueStore,
}

impl<'a> ObjectSource<'a> {
    pub fn new(object: &'a DomainRef, store: &'a dyn FieldValueStore) -> Self {
        Self { object, store }
    }
}

#[async_trait]
impl<'a> ValueSource for ObjectSource<'a> {
    async fn try_get_raw(&self, key: &str) -> Option<Value> {
        self.store
            .get_field(key, self.object.id, ValueFormat::Raw)
            .await
    }

    async fn get_formatted(&self, key: &str) -> Option<Value> {
        self.store
            .get_field(key, self.object.id, ValueFormat::Formatted)
            .await
    }
}

/// Selects the [`ValueSource`] for a resolver parent.
pub struct ValueResolver;

impl ValueResolver {
    /// Wraps the parent value, or `None` when it is neither a mapping nor a
    /// domain object.
    pub fn source<'a>(
        parent: &'a FieldValue<'_>,
        store: &'a dyn FieldValueStore,
    ) -> Option<Box<dyn ValueSource + 'a>> {
        if let Some(object) = parent.downcast_ref::<DomainRef>() {
            return Some(Box::new(ObjectSource::new(object, store)));
        }
        match parent.as_value() {
            Some(Value::Object(map)) => Some(Box::new(MappingSource::new(map))),
            _ => None,
        }
    }

    /// Looks up a field's raw value on any root, treating empty values as absent.
    pub async fn resolve(source: &dyn ValueSource, key: &str) -> Option<Value> {
        source
            .try_get_raw(key)
            .await
            .filter(|value| !is_empty(value))
    }

    /// Looks up a field's display value, treating empty values as absent.
    pub async fn resolve_formatted(source: &dyn ValueSource, key: &str) -> Option<Value> {
        source
            .get_formatted(key)
            .await
            .filter(|value| !is_empty(value))
    }
}

/// Null, empty strings, empty lists and empty objects count as "no value".
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
