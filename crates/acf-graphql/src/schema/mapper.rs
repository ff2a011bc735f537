//! Field kind to GraphQL type mapping.
//!
//! Each ACF kind maps to a type reference and a [`ResolveStrategy`].
//! Composite kinds (group, repeater, google map) generate an object type the
//! first time they are seen and reuse it afterwards.

use async_graphql::Value;
use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::augmenter::SchemaAugmenter;
use super::registry::{FieldConfig, TypeRegistry};
use crate::model::{FieldDefinition, FieldGroup, FieldKind};
use crate::naming::{is_valid_graphql_name, ucfirst};
use crate::resolvers::{FieldResolver, ResolveStrategy};

/// Host union of all post object types.
pub const POST_OBJECT_UNION: &str = "PostObjectUnion";
/// Host union of all term object types.
pub const TERM_OBJECT_UNION: &str = "TermObjectUnion";
pub const MEDIA_ITEM_TYPE: &str = "MediaItem";
pub const USER_TYPE: &str = "User";
/// Generated type shared by every google map field.
pub const GOOGLE_MAP_TYPE: &str = "ACFGoogleMap";

/// Result of mapping one field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedField {
    pub type_ref: TypeRef,
    pub resolver: FieldResolver,
}

/// Maps field declarations to types, generating composite types on demand.
pub struct FieldTypeMapper<'a> {
    augmenter: &'a SchemaAugmenter,
}

impl<'a> FieldTypeMapper<'a> {
    pub fn new(augmenter: &'a SchemaAugmenter) -> Self {
        Self { augmenter }
    }

    /// Maps a field whose normalized name is `name`.
    ///
    /// Returns `None` for kinds that have no place in the schema.
    pub fn map(
        &self,
        registry: &mut dyn TypeRegistry,
        field: &FieldDefinition,
        name: &str,
        depth: usize,
    ) -> Option<MappedField> {
        let key = field.key.as_str();
        let mapped = |type_ref: TypeRef, strategy: ResolveStrategy| {
            Some(MappedField {
                type_ref,
                resolver: FieldResolver::acf(key, strategy),
            })
        };

        match &field.kind {
            FieldKind::Text
            | FieldKind::Textarea
            | FieldKind::Wysiwyg
            | FieldKind::Email
            | FieldKind::Url
            | FieldKind::Password
            | FieldKind::ColorPicker
            | FieldKind::ButtonGroup
            | FieldKind::Oembed
            | FieldKind::Message => {
                mapped(TypeRef::named(TypeRef::STRING), ResolveStrategy::String)
            }
            FieldKind::Number => mapped(TypeRef::named(TypeRef::FLOAT), ResolveStrategy::Float),
            FieldKind::TrueFalse => {
                mapped(TypeRef::named(TypeRef::BOOLEAN), ResolveStrategy::Boolean)
            }
            FieldKind::DatePicker | FieldKind::TimePicker | FieldKind::DateTimePicker => {
                mapped(TypeRef::named(TypeRef::STRING), ResolveStrategy::Formatted)
            }
            FieldKind::Checkbox => mapped(
                TypeRef::named_list(TypeRef::STRING),
                ResolveStrategy::StringList,
            ),
            FieldKind::PostObject | FieldKind::PageLink => {
                mapped(TypeRef::named(POST_OBJECT_UNION), ResolveStrategy::PostObject)
            }
            FieldKind::Relationship => mapped(
                TypeRef::named_list(POST_OBJECT_UNION),
                ResolveStrategy::PostObjects,
            ),
            FieldKind::Image | FieldKind::File => {
                mapped(TypeRef::named(MEDIA_ITEM_TYPE), ResolveStrategy::Media)
            }
            FieldKind::Gallery => mapped(
                TypeRef::named_list(MEDIA_ITEM_TYPE),
                ResolveStrategy::Gallery,
            ),
            FieldKind::User => mapped(TypeRef::named(USER_TYPE), ResolveStrategy::User),
            FieldKind::Taxonomy => mapped(
                TypeRef::named_list(TERM_OBJECT_UNION),
                ResolveStrategy::Terms,
            ),
            FieldKind::Link => mapped(TypeRef::named(TypeRef::STRING), ResolveStrategy::LinkUrl),
            FieldKind::GoogleMap => {
                ensure_google_map_type(registry);
                mapped(TypeRef::named(GOOGLE_MAP_TYPE), ResolveStrategy::Raw)
            }
            FieldKind::Group => {
                let type_name = self.composite_type(registry, field, name, "FieldGroup", depth)?;
                mapped(TypeRef::named(type_name), ResolveStrategy::Raw)
            }
            FieldKind::Repeater => {
                let type_name = self.composite_type(registry, field, name, "Repeater", depth)?;
                mapped(TypeRef::named_list(type_name), ResolveStrategy::Rows)
            }
            FieldKind::Accordion => {
                trace!(field_key = %key, "Accordion fields are presentational, skipping");
                None
            }
            FieldKind::FlexibleContent => {
                debug!(field_key = %key, name = %name, "Flexible content fields are not supported");
                None
            }
            FieldKind::Missing | FieldKind::Unsupported(_) => {
                debug!(field_key = %key, kind = %field.kind, "Unsupported field kind, skipping");
                None
            }
        }
    }

    /// Returns the generated type for a group or repeater field, creating it
    /// and registering its sub-fields the first time the name is seen.
    ///
    /// Returns `None` when the name does not form a valid GraphQL type name.
    fn composite_type(
        &self,
        registry: &mut dyn TypeRegistry,
        field: &FieldDefinition,
        name: &str,
        suffix: &str,
        depth: usize,
    ) -> Option<String> {
        let type_name = format!("{}{suffix}", ucfirst(name));
        if !is_valid_graphql_name(&type_name) {
            debug!(field_key = %field.key, type_name = %type_name, "Invalid generated type name, skipping");
            return None;
        }
        if registry.exists(&type_name) {
            trace!(type_name = %type_name, "Reusing generated type");
            return Some(type_name);
        }

        let mut fields = IndexMap::new();
        fields.insert(
            "fieldGroupName".to_string(),
            FieldConfig::new(
                TypeRef::named(TypeRef::STRING),
                "Name of the field the group belongs to",
                FieldResolver::Constant(Value::String(field.name.clone())),
            ),
        );

        if let Err(e) = registry.register_object_type(&type_name, "Field Group", fields) {
            debug!(type_name = %type_name, error = %e, "Generated type not registered");
            return Some(type_name);
        }

        let max_depth = self.augmenter.config().max_nesting_depth;
        if depth >= max_depth {
            warn!(
                type_name = %type_name,
                depth,
                max_depth,
                "Composite field nested too deeply, sub-fields not registered"
            );
            return Some(type_name);
        }

        debug!(type_name = %type_name, sub_fields = field.sub_fields.len(), "Generated composite type");
        self.augmenter.add_field_group_fields(
            registry,
            &FieldGroup::nested(field),
            &type_name,
            depth + 1,
        );
        Some(type_name)
    }
}

/// Registers the shared map type unless it already exists.
fn ensure_google_map_type(registry: &mut dyn TypeRegistry) {
    if registry.exists(GOOGLE_MAP_TYPE) {
        return;
    }

    let sub_field = |type_name: &str, description: &str, sub_key: &'static str| {
        FieldConfig::new(
            TypeRef::named(type_name),
            description,
            FieldResolver::SubKey(sub_key),
        )
    };

    let mut fields = IndexMap::new();
    fields.insert(
        "streetAddress".to_string(),
        sub_field(
            TypeRef::STRING,
            "The street address associated with the map",
            "address",
        ),
    );
    fields.insert(
        "latitude".to_string(),
        sub_field(TypeRef::FLOAT, "The latitude associated with the map", "lat"),
    );
    fields.insert(
        "longitude".to_string(),
        sub_field(TypeRef::FLOAT, "The longitude associated with the map", "lng"),
    );

    if let Err(e) = registry.register_object_type(GOOGLE_MAP_TYPE, "Google Map field", fields) {
        debug!(error = %e, "Google map type not registered");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AcfConfig;
    use crate::schema::registry::SchemaRegistry;
    use crate::store::InMemoryFieldGroupStore;
    use crate::visibility::VisibilityPolicy;

    fn augmenter(config: AcfConfig) -> SchemaAugmenter {
        SchemaAugmenter::new(
            Arc::new(InMemoryFieldGroupStore::default()),
            VisibilityPolicy::new(),
            config,
        )
    }

    fn map_kind(kind: FieldKind) -> Option<MappedField> {
        let augmenter = augmenter(AcfConfig::default());
        let mut registry = SchemaRegistry::new();
        let field = FieldDefinition::new("field_1", "sample", kind);
        FieldTypeMapper::new(&augmenter).map(&mut registry, &field, "sample", 0)
    }

    #[test]
    fn test_scalar_kinds() {
        let text = map_kind(FieldKind::Wysiwyg).unwrap();
        assert_eq!(text.type_ref, TypeRef::named(TypeRef::STRING));
        assert_eq!(
            text.resolver,
            FieldResolver::acf("field_1", ResolveStrategy::String)
        );

        let number = map_kind(FieldKind::Number).unwrap();
        assert_eq!(number.type_ref, TypeRef::named(TypeRef::FLOAT));

        let toggle = map_kind(FieldKind::TrueFalse).unwrap();
        assert_eq!(toggle.type_ref, TypeRef::named(TypeRef::BOOLEAN));

        let checkbox = map_kind(FieldKind::Checkbox).unwrap();
        assert_eq!(checkbox.type_ref, TypeRef::named_list(TypeRef::STRING));
    }

    #[test]
    fn test_temporal_kinds_use_formatted_value() {
        for kind in [
            FieldKind::DatePicker,
            FieldKind::TimePicker,
            FieldKind::DateTimePicker,
        ] {
            let mapped = map_kind(kind).unwrap();
            assert_eq!(
                mapped.resolver,
                FieldResolver::acf("field_1", ResolveStrategy::Formatted)
            );
        }
    }

    #[test]
    fn test_reference_kinds() {
        assert_eq!(
            map_kind(FieldKind::PageLink).unwrap().type_ref,
            TypeRef::named(POST_OBJECT_UNION)
        );
        assert_eq!(
            map_kind(FieldKind::Relationship).unwrap().type_ref,
            TypeRef::named_list(POST_OBJECT_UNION)
        );
        assert_eq!(
            map_kind(FieldKind::Gallery).unwrap().type_ref,
            TypeRef::named_list(MEDIA_ITEM_TYPE)
        );
        assert_eq!(
            map_kind(FieldKind::Taxonomy).unwrap().type_ref,
            TypeRef::named_list(TERM_OBJECT_UNION)
        );
        assert_eq!(
            map_kind(FieldKind::User).unwrap().resolver,
            FieldResolver::acf("field_1", ResolveStrategy::User)
        );
    }

    #[test]
    fn test_excluded_kinds() {
        assert!(map_kind(FieldKind::Accordion).is_none());
        assert!(map_kind(FieldKind::FlexibleContent).is_none());
        assert!(map_kind(FieldKind::Missing).is_none());
        assert!(map_kind(FieldKind::Unsupported("range".into())).is_none());
    }

    #[test]
    fn test_google_map_type_generated_once() {
        let augmenter = augmenter(AcfConfig::default());
        let mut registry = SchemaRegistry::new();
        let mapper = FieldTypeMapper::new(&augmenter);

        for key in ["field_1", "field_2"] {
            let field = FieldDefinition::new(key, "location", FieldKind::GoogleMap);
            let mapped = mapper.map(&mut registry, &field, "location", 0).unwrap();
            assert_eq!(mapped.type_ref, TypeRef::named(GOOGLE_MAP_TYPE));
        }

        assert_eq!(registry.type_count(), 1);
        assert_eq!(
            registry.field_names(GOOGLE_MAP_TYPE),
            vec!["streetAddress", "latitude", "longitude"]
        );
    }

    #[test]
    fn test_group_generates_type_with_sub_fields() {
        let augmenter = augmenter(AcfConfig::default());
        let mut registry = SchemaRegistry::new();
        let field = FieldDefinition::new("field_1", "hero_banner", FieldKind::Group)
            .with_sub_fields(vec![
                FieldDefinition::new("field_2", "Headline", FieldKind::Text),
                FieldDefinition::new("field_3", "Panels", FieldKind::Accordion),
            ]);

        let mapped = FieldTypeMapper::new(&augmenter)
            .map(&mut registry, &field, "heroBanner", 0)
            .unwrap();

        assert_eq!(mapped.type_ref, TypeRef::named("HeroBannerFieldGroup"));
        assert_eq!(
            registry.field_names("HeroBannerFieldGroup"),
            vec!["fieldGroupName", "headline"]
        );
        assert_eq!(
            registry
                .field("HeroBannerFieldGroup", "fieldGroupName")
                .unwrap()
                .resolver,
            FieldResolver::Constant(Value::from("hero_banner"))
        );
    }

    #[test]
    fn test_repeater_is_list_of_generated_type() {
        let augmenter = augmenter(AcfConfig::default());
        let mut registry = SchemaRegistry::new();
        let field = FieldDefinition::new("field_1", "slides", FieldKind::Repeater)
            .with_sub_fields(vec![FieldDefinition::new("field_2", "image", FieldKind::Image)]);

        let mapped = FieldTypeMapper::new(&augmenter)
            .map(&mut registry, &field, "slides", 0)
            .unwrap();

        assert_eq!(mapped.type_ref, TypeRef::named_list("SlidesRepeater"));
        assert_eq!(
            mapped.resolver,
            FieldResolver::acf("field_1", ResolveStrategy::Rows)
        );
        assert_eq!(
            registry.field("SlidesRepeater", "image").unwrap().type_ref,
            TypeRef::named(MEDIA_ITEM_TYPE)
        );
    }

    #[test]
    fn test_same_composite_name_registered_once() {
        let augmenter = augmenter(AcfConfig::default());
        let mut registry = SchemaRegistry::new();
        let mapper = FieldTypeMapper::new(&augmenter);

        let first = FieldDefinition::new("field_1", "details", FieldKind::Group)
            .with_sub_fields(vec![FieldDefinition::new("field_2", "a", FieldKind::Text)]);
        let second = FieldDefinition::new("field_9", "Details", FieldKind::Group)
            .with_sub_fields(vec![FieldDefinition::new("field_10", "b", FieldKind::Text)]);

        mapper.map(&mut registry, &first, "details", 0).unwrap();
        let mapped = mapper.map(&mut registry, &second, "details", 0).unwrap();

        assert_eq!(mapped.type_ref, TypeRef::named("DetailsFieldGroup"));
        assert_eq!(registry.type_count(), 1);
        assert_eq!(
            registry.field_names("DetailsFieldGroup"),
            vec!["fieldGroupName", "a"]
        );
    }

    #[test]
    fn test_invalid_composite_type_name_is_skipped() {
        let augmenter = augmenter(AcfConfig::default());
        let mut registry = SchemaRegistry::new();
        let field = FieldDefinition::new("field_1", "3d", FieldKind::Group)
            .with_sub_fields(vec![FieldDefinition::new("field_2", "depth", FieldKind::Text)]);

        let mapped = FieldTypeMapper::new(&augmenter).map(&mut registry, &field, "3d", 0);

        assert!(mapped.is_none());
        assert!(!registry.exists("3dFieldGroup"));
        assert_eq!(registry.type_count(), 0);
    }

    #[test]
    fn test_nesting_depth_guard() {
        let config = AcfConfig {
            max_nesting_depth: 1,
            ..AcfConfig::default()
        };
        let augmenter = augmenter(config);
        let mut registry = SchemaRegistry::new();

        let inner = FieldDefinition::new("field_3", "inner", FieldKind::Group)
            .with_sub_fields(vec![FieldDefinition::new("field_4", "leaf", FieldKind::Text)]);
        let outer =
            FieldDefinition::new("field_1", "outer", FieldKind::Group).with_sub_fields(vec![inner]);

        FieldTypeMapper::new(&augmenter)
            .map(&mut registry, &outer, "outer", 0)
            .unwrap();

        assert_eq!(
            registry.field_names("OuterFieldGroup"),
            vec!["fieldGroupName", "inner"]
        );
        assert_eq!(registry.field_names("InnerFieldGroup"), vec!["fieldGroupName"]);
    }
}
