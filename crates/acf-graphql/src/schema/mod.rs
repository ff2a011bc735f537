//! Schema augmentation and assembly.
//!
//! ## Components
//!
//! - [`SchemaAugmenter`] - Registers field group fields onto entity types
//! - [`FieldTypeMapper`] - Maps one field to a type and resolver
//! - [`SchemaRegistry`] - Type set handed to async-graphql
//! - [`AcfSchemaBuilder`] - Host types, augmentation and root query
//! - [`LazySchema`] - Build on first use, rebuild after invalidation
//!
//! ## Build pass
//!
//! 1. Host object types and the post/term unions are registered
//! 2. Each entity type's field groups pass the visibility policy
//! 3. Fields are named, mapped and registered onto the entity type
//! 4. Group and repeater fields generate their type once and recurse
//! 5. The registry is handed to the async-graphql schema builder

mod augmenter;
mod builder;
mod lazy;
mod mapper;
mod registry;

pub use augmenter::SchemaAugmenter;
pub use builder::{AcfSchemaBuilder, QUERY_TYPE, SchemaBuilderConfig};
pub use lazy::{LazySchema, SchemaState};
pub use mapper::{
    FieldTypeMapper, GOOGLE_MAP_TYPE, MEDIA_ITEM_TYPE, MappedField, POST_OBJECT_UNION,
    TERM_OBJECT_UNION, USER_TYPE,
};
pub use registry::{FieldConfig, SchemaRegistry, TypeRegistry};
