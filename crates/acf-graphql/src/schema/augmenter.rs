//! Projection of field groups onto GraphQL object types.
//!
//! For every entity type the host exposes, the augmenter loads the field
//! groups attached to it and registers each visible field onto the entity's
//! object type. Composite fields recurse through the same routine with the
//! generated type as target.

use std::borrow::Cow;

use tracing::{debug, trace, warn};

use super::mapper::FieldTypeMapper;
use super::registry::{FieldConfig, TypeRegistry};
use crate::config::AcfConfig;
use crate::model::{EntityType, FieldGroup};
use crate::naming::{camel_case, is_valid_graphql_name};
use crate::store::DynFieldGroupStore;
use crate::visibility::VisibilityPolicy;

/// Drives one augmentation pass over a [`TypeRegistry`].
pub struct SchemaAugmenter {
    store: DynFieldGroupStore,
    policy: VisibilityPolicy,
    config: AcfConfig,
}

impl SchemaAugmenter {
    pub fn new(store: DynFieldGroupStore, policy: VisibilityPolicy, config: AcfConfig) -> Self {
        Self {
            store,
            policy,
            config,
        }
    }

    pub fn config(&self) -> &AcfConfig {
        &self.config
    }

    /// Registers the fields of every entity type's field groups.
    ///
    /// Returns the number of fields added directly to entity types; fields
    /// of generated types are not counted. Running the pass again over the
    /// same registry adds nothing.
    pub fn augment(&self, registry: &mut dyn TypeRegistry, entity_types: &[EntityType]) -> usize {
        let mut registered = 0;

        for entity_type in entity_types {
            let groups = self.store.field_groups_for(&entity_type.key);
            if groups.is_empty() {
                trace!(entity_type = %entity_type.key, "No field groups, skipping entity type");
                continue;
            }

            if !registry.exists(&entity_type.type_name) {
                warn!(
                    entity_type = %entity_type.key,
                    type_name = %entity_type.type_name,
                    "Entity type has no GraphQL type, skipping"
                );
                continue;
            }

            for group in &groups {
                registered += self.add_field_group_fields(registry, group, &entity_type.type_name, 0);
            }
        }

        debug!(
            entity_types = entity_types.len(),
            registered, "Field group augmentation complete"
        );
        registered
    }

    /// Registers the fields of one group onto `type_name`.
    ///
    /// `depth` counts the composite fields between the group and its entity
    /// type. Returns the number of fields added to `type_name`.
    pub fn add_field_group_fields(
        &self,
        registry: &mut dyn TypeRegistry,
        group: &FieldGroup,
        type_name: &str,
        depth: usize,
    ) -> usize {
        if !self.policy.should_expose(group) {
            debug!(group = %group.key, type_name = %type_name, "Field group not exposed");
            return 0;
        }

        let fields = if group.fields.is_empty() {
            Cow::Owned(self.store.fields(group))
        } else {
            Cow::Borrowed(&group.fields)
        };

        if fields.is_empty() {
            trace!(group = %group.key, "Field group has no fields");
            return 0;
        }

        let mapper = FieldTypeMapper::new(self);
        let mut registered = 0;

        for field in fields.iter() {
            let name = camel_case(&field.name, &[]);
            if !is_valid_graphql_name(&name) {
                debug!(field_key = %field.key, name = %field.name, "Field has no valid GraphQL name, skipping");
                continue;
            }
            if !self.policy.field_is_exposed(field) {
                trace!(field_key = %field.key, name = %field.name, "Field hidden");
                continue;
            }

            let Some(mapped) = mapper.map(registry, field, &name, depth) else {
                continue;
            };

            let description = field
                .instructions
                .as_deref()
                .filter(|text| !text.is_empty())
                .unwrap_or(&self.config.default_field_description);

            match registry.register_field(
                type_name,
                &name,
                FieldConfig::new(mapped.type_ref, description, mapped.resolver),
            ) {
                Ok(()) => registered += 1,
                Err(e) if e.is_duplicate() => {
                    trace!(type_name = %type_name, field = %name, "Field already registered");
                }
                Err(e) => {
                    warn!(type_name = %type_name, field = %name, error = %e, "Failed to register field");
                }
            }
        }

        registered
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::dynamic::Object;

    use super::*;
    use crate::model::{FieldDefinition, FieldKind, LocationRule};
    use crate::resolvers::DomainKind;
    use crate::schema::registry::SchemaRegistry;
    use crate::store::InMemoryFieldGroupStore;

    fn group_for(entity_type: &str, fields: Vec<FieldDefinition>) -> FieldGroup {
        FieldGroup {
            key: format!("group_{entity_type}"),
            fields,
            active: Some(true),
            location: vec![vec![LocationRule {
                param: "post_type".into(),
                operator: "==".into(),
                value: entity_type.into(),
            }]],
            show_in_graphql: Some(true),
            ..FieldGroup::default()
        }
    }

    fn registry_with(types: &[&str]) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        for type_name in types {
            registry
                .register_host_object(type_name, Object::new(*type_name), &["databaseId"])
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_entity_type_without_groups_does_not_stop_pass() {
        let store = InMemoryFieldGroupStore::new(vec![group_for(
            "page",
            vec![FieldDefinition::new("field_1", "subtitle", FieldKind::Text)],
        )]);
        let augmenter =
            SchemaAugmenter::new(Arc::new(store), VisibilityPolicy::new(), AcfConfig::default());
        let mut registry = registry_with(&["Post", "Page"]);

        let added = augmenter.augment(
            &mut registry,
            &[
                EntityType::new("post", "Post", DomainKind::Post),
                EntityType::new("page", "Page", DomainKind::Post),
            ],
        );

        assert_eq!(added, 1);
        assert!(registry.field_names("Post").is_empty());
        assert_eq!(registry.field_names("Page"), vec!["subtitle"]);
    }

    #[test]
    fn test_fields_are_named_and_described() {
        let mut described = FieldDefinition::new("field_2", "hero_text", FieldKind::Textarea);
        described.instructions = Some("Shown above the fold".into());
        let store = InMemoryFieldGroupStore::new(vec![group_for(
            "post",
            vec![
                FieldDefinition::new("field_1", "Page Title", FieldKind::Text),
                described,
                FieldDefinition::new("field_3", "!!!", FieldKind::Text),
                FieldDefinition::new("field_4", "2024 budget", FieldKind::Number),
            ],
        )]);
        let augmenter =
            SchemaAugmenter::new(Arc::new(store), VisibilityPolicy::new(), AcfConfig::default());
        let mut registry = registry_with(&["Post"]);

        augmenter.augment(
            &mut registry,
            &[EntityType::new("post", "Post", DomainKind::Post)],
        );

        assert_eq!(registry.field_names("Post"), vec!["pageTitle", "heroText"]);
        assert_eq!(
            registry.field("Post", "pageTitle").unwrap().description,
            AcfConfig::default().default_field_description
        );
        assert_eq!(
            registry.field("Post", "heroText").unwrap().description,
            "Shown above the fold"
        );
    }

    #[test]
    fn test_missing_host_type_is_skipped() {
        let store = InMemoryFieldGroupStore::new(vec![group_for(
            "event",
            vec![FieldDefinition::new("field_1", "venue", FieldKind::Text)],
        )]);
        let augmenter =
            SchemaAugmenter::new(Arc::new(store), VisibilityPolicy::new(), AcfConfig::default());
        let mut registry = registry_with(&["Post"]);

        let added = augmenter.augment(
            &mut registry,
            &[EntityType::new("event", "Event", DomainKind::Post)],
        );

        assert_eq!(added, 0);
        assert!(!registry.exists("Event"));
    }
}
