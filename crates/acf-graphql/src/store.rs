//! Read contracts for field declarations and stored field values.
//!
//! The engine never writes through these traits. Field groups are read once
//! per schema build; field values are read per request by resolvers.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::Value;
use async_trait::async_trait;
use tracing::debug;

use crate::error::AcfError;
use crate::model::{FieldDefinition, FieldGroup};

/// Source of field group declarations.
pub trait FieldGroupStore: Send + Sync {
    /// Lists the field groups attached to an entity type key (e.g. `post`).
    fn field_groups_for(&self, entity_type: &str) -> Vec<FieldGroup>;

    /// Lists the fields of a group.
    fn fields(&self, group: &FieldGroup) -> Vec<FieldDefinition>;
}

/// Shared field group store.
pub type DynFieldGroupStore = Arc<dyn FieldGroupStore>;

/// Representation requested from the value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Machine value as stored (ids, timestamps like `20240131`).
    Raw,
    /// Display value (formatted dates).
    Formatted,
}

/// Storage of field values keyed by field key and object identifier.
#[async_trait]
pub trait FieldValueStore: Send + Sync {
    async fn get_field(
        &self,
        field_key: &str,
        object_id: u64,
        format: ValueFormat,
    ) -> Option<Value>;
}

/// Shared field value store.
pub type DynFieldValueStore = Arc<dyn FieldValueStore>;

/// Field group store backed by an ACF JSON export.
///
/// Groups are matched to entity types through their `==` location rules.
/// Field lists are held apart from the groups and served by [`fields`].
///
/// [`fields`]: FieldGroupStore::fields
#[derive(Debug, Default)]
pub struct InMemoryFieldGroupStore {
    groups: Vec<FieldGroup>,
    fields_by_group: HashMap<String, Vec<FieldDefinition>>,
}

impl InMemoryFieldGroupStore {
    pub fn new(groups: Vec<FieldGroup>) -> Self {
        let mut fields_by_group = HashMap::new();
        let groups: Vec<FieldGroup> = groups
            .into_iter()
            .map(|mut group| {
                fields_by_group.insert(group.key.clone(), std::mem::take(&mut group.fields));
                group
            })
            .collect();

        debug!(group_count = groups.len(), "InMemoryFieldGroupStore initialized");

        Self {
            groups,
            fields_by_group,
        }
    }

    /// Parses an export: either a single group object or an array of groups.
    ///
    /// # Errors
    ///
    /// Returns [`AcfError::Export`] if the JSON does not describe field groups.
    pub fn from_json_str(json: &str) -> Result<Self, AcfError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let groups = match value {
            serde_json::Value::Array(_) => serde_json::from_value(value)?,
            other => vec![serde_json::from_value(other)?],
        };
        Ok(Self::new(groups))
    }

    /// Returns the number of groups loaded.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl FieldGroupStore for InMemoryFieldGroupStore {
    fn field_groups_for(&self, entity_type: &str) -> Vec<FieldGroup> {
        self.groups
            .iter()
            .filter(|group| {
                group.location.iter().any(|rules| {
                    rules
                        .iter()
                        .any(|rule| rule.operator == "==" && rule.value == entity_type)
                })
            })
            .cloned()
            .collect()
    }

    fn fields(&self, group: &FieldGroup) -> Vec<FieldDefinition> {
        self.fields_by_group
            .get(&group.key)
            .cloned()
            .unwrap_or_default()
    }
}
