//! Resolvers for augmented fields.
//!
//! Every registered field carries a [`FieldResolver`]: a closed description
//! of how its value is produced. The description is turned into an
//! async-graphql resolver closure only when the schema is assembled.
//!
//! - `value`: reading raw and formatted values from a resolver root
//! - `relationship`: turning ids into posts, terms, users and media items

mod relationship;
mod value;

pub use relationship::{
    DomainKind, DomainRef, DomainResolvers, EntityResolver, RelationshipResolver,
    parse_identifier,
};
pub use value::{MappingSource, ObjectSource, ValueResolver, ValueSource, is_empty};

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, ResolverContext, TypeRef};
use async_graphql::{Error as GraphQLError, Number, Value};
use tracing::trace;

use crate::context::AcfContext;

/// Helper to extract the augmentation context from resolver context.
pub(crate) fn get_acf_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a AcfContext, GraphQLError> {
    ctx.data::<AcfContext>()
        .map_err(|_| GraphQLError::new("ACF context not available"))
}

/// How a stored field value becomes a GraphQL value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Raw mapping of a group or map value, the root of the generated type.
    Raw,
    /// Raw value as a string; numbers and booleans are stringified.
    String,
    /// Raw value coerced to a float; numeric strings are accepted.
    Float,
    /// Raw value coerced to a boolean; `"1"`/`"0"` are accepted.
    Boolean,
    /// Formatted display value; only available on domain object roots.
    Formatted,
    /// Raw list with each item as a string, null for non-list values.
    StringList,
    /// A single post, either realized already or looked up by id.
    PostObject,
    /// Post ids resolved in order.
    PostObjects,
    Media,
    Gallery,
    User,
    Terms,
    /// The `url` entry of a link value.
    LinkUrl,
    /// A list of row mappings, each the root of a generated type.
    Rows,
}

/// Resolver description attached to a registered field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResolver {
    /// Reads the field with the given ACF key from the parent root.
    Acf {
        key: String,
        strategy: ResolveStrategy,
    },
    /// Reads one entry of a raw mapping parent (generated map types).
    SubKey(&'static str),
    /// Always returns the same value (`fieldGroupName`).
    Constant(Value),
}

impl FieldResolver {
    pub fn acf(key: impl Into<String>, strategy: ResolveStrategy) -> Self {
        Self::Acf {
            key: key.into(),
            strategy,
        }
    }

    /// Builds the async-graphql field for this resolver.
    pub fn into_field(self, name: &str, type_ref: TypeRef, description: &str) -> Field {
        Field::new(name, type_ref, move |ctx| {
            let resolver = self.clone();
            FieldFuture::new(async move { resolver.resolve(&ctx).await })
        })
        .description(description)
    }

    async fn resolve<'a>(
        &self,
        ctx: &ResolverContext<'a>,
    ) -> Result<Option<FieldValue<'a>>, GraphQLError> {
        match self {
            Self::Constant(value) => Ok(Some(FieldValue::value(value.clone()))),
            Self::SubKey(sub_key) => Ok(match ctx.parent_value.as_value() {
                Some(Value::Object(map)) => map
                    .get(*sub_key)
                    .filter(|value| !is_empty(value))
                    .cloned()
                    .map(FieldValue::value),
                _ => None,
            }),
            Self::Acf { key, strategy } => {
                let acf_ctx = get_acf_context(ctx)?;
                let Some(source) = ValueResolver::source(ctx.parent_value, acf_ctx.store.as_ref())
                else {
                    trace!(field_key = %key, "Parent is neither a mapping nor a domain object");
                    return Ok(None);
                };
                Ok(resolve_strategy(*strategy, key, source.as_ref(), acf_ctx).await)
            }
        }
    }
}

/// Produces the value of an ACF field for one strategy.
async fn resolve_strategy<'a>(
    strategy: ResolveStrategy,
    key: &str,
    source: &dyn ValueSource,
    acf_ctx: &AcfContext,
) -> Option<FieldValue<'a>> {
    if strategy == ResolveStrategy::Formatted {
        return ValueResolver::resolve_formatted(source, key)
            .await
            .map(FieldValue::value);
    }

    let raw = ValueResolver::resolve(source, key).await?;
    let relationship = RelationshipResolver::new(&acf_ctx.resolvers);

    match strategy {
        ResolveStrategy::Raw => Some(FieldValue::value(raw)),
        ResolveStrategy::String => coerce_string(&raw).map(FieldValue::value),
        ResolveStrategy::Float => coerce_float(&raw).map(FieldValue::value),
        ResolveStrategy::Boolean => coerce_boolean(&raw).map(FieldValue::value),
        ResolveStrategy::StringList => match raw {
            Value::List(items) => Some(FieldValue::list(
                items
                    .iter()
                    .map(|item| coerce_string(item).map_or(FieldValue::NULL, FieldValue::value)),
            )),
            _ => None,
        },
        ResolveStrategy::LinkUrl => match raw {
            Value::Object(mut map) => map
                .swap_remove("url")
                .filter(|url| !is_empty(url))
                .map(FieldValue::value),
            _ => None,
        },
        ResolveStrategy::Rows => match raw {
            Value::List(rows) => Some(FieldValue::list(
                rows.into_iter()
                    .filter(|row| matches!(row, Value::Object(_)))
                    .map(FieldValue::value),
            )),
            _ => None,
        },
        ResolveStrategy::PostObject => {
            let post = match DomainRef::from_realized(&raw) {
                Some(post) => Some(post),
                None => relationship.resolve_one(&raw, DomainKind::Post).await,
            };
            post.map(union_member)
        }
        ResolveStrategy::PostObjects => {
            let posts = relationship
                .resolve_many(&identifiers(raw), DomainKind::Post)
                .await;
            Some(FieldValue::list(posts.into_iter().map(union_member)))
        }
        ResolveStrategy::Media => relationship
            .resolve_one(&raw, DomainKind::Media)
            .await
            .map(FieldValue::owned_any),
        ResolveStrategy::Gallery => {
            let media = relationship
                .resolve_many(&identifiers(raw), DomainKind::Media)
                .await;
            Some(FieldValue::list(media.into_iter().map(FieldValue::owned_any)))
        }
        ResolveStrategy::User => relationship
            .resolve_one(&raw, DomainKind::User)
            .await
            .map(FieldValue::owned_any),
        ResolveStrategy::Terms => {
            let terms = relationship
                .resolve_many(&identifiers(raw), DomainKind::Term)
                .await;
            Some(FieldValue::list(terms.into_iter().map(union_member)))
        }
        ResolveStrategy::Formatted => None,
    }
}

/// Wraps a resolved entity so a union can pick its concrete type.
fn union_member<'a>(domain_ref: DomainRef) -> FieldValue<'a> {
    let type_name = domain_ref.type_name.clone();
    FieldValue::owned_any(domain_ref).with_type(type_name)
}

/// A list value yields its items, a single value yields itself.
fn identifiers(raw: Value) -> Vec<Value> {
    match raw {
        Value::List(items) => items,
        single => vec![single],
    }
}

fn coerce_string(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(_) => Some(raw.clone()),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Boolean(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn coerce_float(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(_) => Some(raw.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn coerce_boolean(raw: &Value) -> Option<Value> {
    match raw {
        Value::Boolean(_) => Some(raw.clone()),
        Value::Number(n) => n.as_f64().map(|f| Value::Boolean(f != 0.0)),
        Value::String(s) => match s.trim() {
            "1" | "true" => Some(Value::Boolean(true)),
            "0" | "false" => Some(Value::Boolean(false)),
            _ => None,
        },
        _ => None,
    }
}
