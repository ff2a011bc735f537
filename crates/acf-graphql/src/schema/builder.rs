//! Augmented GraphQL schema builder.
//!
//! This module provides `AcfSchemaBuilder`, which assembles a dynamic
//! async-graphql schema: minimal host types for the exposed entity types,
//! the field group projection on top of them, and a root query to load
//! entities by database id.

use async_graphql::Value;
use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, Schema, TypeRef, Union};
use tracing::debug;

use super::augmenter::SchemaAugmenter;
use super::mapper::{MEDIA_ITEM_TYPE, POST_OBJECT_UNION, TERM_OBJECT_UNION, USER_TYPE};
use super::registry::SchemaRegistry;
use crate::config::AcfConfig;
use crate::context::AcfContext;
use crate::error::AcfError;
use crate::model::EntityType;
use crate::naming::lcfirst;
use crate::resolvers::{DomainKind, DomainRef, get_acf_context};
use crate::store::DynFieldGroupStore;
use crate::visibility::VisibilityPolicy;

/// Name of the root query type.
pub const QUERY_TYPE: &str = "RootQuery";

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Builds the augmented GraphQL schema.
///
/// Every call to [`build`](Self::build) starts from an empty registry, so a
/// changed field group store is picked up by simply building again.
///
/// # Example
///
/// ```ignore
/// let builder = AcfSchemaBuilder::new(
///     vec![EntityType::new("post", "Post", DomainKind::Post)],
///     group_store,
///     AcfContext::new(value_store, resolvers),
///     AcfConfig::default(),
/// );
///
/// let schema = builder.build()?;
/// ```
pub struct AcfSchemaBuilder {
    entity_types: Vec<EntityType>,
    store: DynFieldGroupStore,
    policy: VisibilityPolicy,
    context: AcfContext,
    config: AcfConfig,
}

impl AcfSchemaBuilder {
    /// Creates a new schema builder with the default visibility policy.
    #[must_use]
    pub fn new(
        entity_types: Vec<EntityType>,
        store: DynFieldGroupStore,
        context: AcfContext,
        config: AcfConfig,
    ) -> Self {
        Self {
            entity_types,
            store,
            policy: VisibilityPolicy::new(),
            context,
            config,
        }
    }

    /// Replaces the visibility policy (e.g. to install override filters).
    #[must_use]
    pub fn with_policy(mut self, policy: VisibilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the GraphQL schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, if no post or term
    /// entity type is exposed, or if async-graphql rejects the schema.
    pub fn build(&self) -> Result<Schema, AcfError> {
        self.config.validate()?;
        debug!(entity_types = self.entity_types.len(), "Starting GraphQL schema build");

        let host_types = self.host_types();
        let mut registry = SchemaRegistry::new();
        register_host_types(&mut registry, &host_types)?;

        let augmenter = SchemaAugmenter::new(
            self.store.clone(),
            self.policy.clone(),
            self.config.clone(),
        );
        augmenter.augment(&mut registry, &self.entity_types);

        let limits = self.config.to_schema_builder_config();
        let mut schema_builder = Schema::build(QUERY_TYPE, None, None)
            .register(build_query_type(&host_types))
            .data(self.context.clone());
        schema_builder = registry.into_schema_builder(schema_builder);

        schema_builder = schema_builder
            .limit_depth(limits.max_depth)
            .limit_complexity(limits.max_complexity);
        if !limits.introspection_enabled {
            schema_builder = schema_builder.disable_introspection();
        }

        let schema = schema_builder
            .finish()
            .map_err(|e| AcfError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }

    /// Entity types plus the media and user types when not already exposed.
    fn host_types(&self) -> Vec<EntityType> {
        let mut host_types = self.entity_types.clone();
        for (type_name, kind) in [(MEDIA_ITEM_TYPE, DomainKind::Media), (USER_TYPE, DomainKind::User)] {
            if !host_types.iter().any(|ty| ty.type_name == type_name) {
                host_types.push(EntityType::new(lcfirst(type_name), type_name, kind));
            }
        }
        host_types
    }
}

/// Registers one object per host type and the post/term unions.
fn register_host_types(
    registry: &mut SchemaRegistry,
    host_types: &[EntityType],
) -> Result<(), AcfError> {
    for host_type in host_types {
        let object = Object::new(&host_type.type_name)
            .description(format!("The {} object type", host_type.type_name))
            .field(
                Field::new("databaseId", TypeRef::named_nn(TypeRef::INT), |ctx| {
                    FieldFuture::new(async move {
                        let domain_ref = ctx.parent_value.try_downcast_ref::<DomainRef>()?;
                        Ok(Some(Value::from(domain_ref.id)))
                    })
                })
                .description("Identifier in the host database"),
            );
        registry.register_host_object(&host_type.type_name, object, &["databaseId"])?;
    }

    for (union_name, kind) in [(POST_OBJECT_UNION, DomainKind::Post), (TERM_OBJECT_UNION, DomainKind::Term)] {
        let members: Vec<&str> = host_types
            .iter()
            .filter(|ty| ty.kind == kind)
            .map(|ty| ty.type_name.as_str())
            .collect();
        if members.is_empty() {
            return Err(AcfError::InvalidConfig(format!(
                "{union_name} needs at least one {kind:?} entity type"
            )));
        }

        let union = members
            .into_iter()
            .fold(Union::new(union_name), |union, member| union.possible_type(member));
        registry.register_union(union_name, union)?;
    }

    Ok(())
}

/// Builds the root query with one `<type>(databaseId: Int!)` field per host type.
fn build_query_type(host_types: &[EntityType]) -> Object {
    let mut query = Object::new(QUERY_TYPE).description("The root entry point into the Graph");

    for host_type in host_types {
        let type_name = host_type.type_name.clone();
        let kind = host_type.kind;
        let field = Field::new(lcfirst(&type_name), TypeRef::named(&type_name), move |ctx| {
            let type_name = type_name.clone();
            FieldFuture::new(async move {
                let id = ctx.args.try_get("databaseId")?.u64()?;
                let acf_ctx = get_acf_context(&ctx)?;
                let found = acf_ctx.resolvers.for_kind(kind).resolve_by_id(id).await;

                // A page id must not resolve through the `post` field.
                Ok(found
                    .filter(|domain_ref| domain_ref.type_name == type_name)
                    .map(FieldValue::owned_any))
            })
        })
        .argument(InputValue::new("databaseId", TypeRef::named_nn(TypeRef::INT)))
        .description(format!("A {} object", host_type.type_name));

        query = query.field(field);
    }

    query
}
