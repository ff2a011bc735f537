//! # acf-graphql
//!
//! Projects ACF-style field groups onto a dynamic GraphQL schema.
//!
//! Field groups are declared outside the schema: an ordered list of fields
//! with a type name each, attached to entity types such as posts or terms.
//! At build time this crate turns those declarations into GraphQL fields:
//!
//! - Scalar fields (text, number, true/false, dates) on the entity type
//! - Relationship fields resolving ids into posts, terms, users and media
//! - Generated object types for groups, repeaters and google maps
//! - An opt-in visibility policy with override filters
//!
//! ## Overview
//!
//! [`AcfSchemaBuilder`] registers minimal host types, runs the
//! [`SchemaAugmenter`] over them and finishes an async-graphql dynamic
//! schema. Resolvers read stored values through [`FieldValueStore`] and the
//! [`DomainResolvers`] held by [`AcfContext`].
//!
//! ## Configuration
//!
//! ```toml
//! [acf]
//! max_nesting_depth = 16
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`model`] - Field group and field declarations
//! - [`naming`] - Label to identifier normalization
//! - [`visibility`] - Exposure rules
//! - [`store`] - Field group and field value stores
//! - [`resolvers`] - Value and relationship resolution
//! - [`schema`] - Augmentation, registry and schema building
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod naming;
pub mod resolvers;
pub mod schema;
pub mod store;
pub mod visibility;

// Re-export main types
pub use config::AcfConfig;
pub use context::AcfContext;
pub use error::AcfError;
pub use model::{EntityType, FieldDefinition, FieldGroup, FieldKind, LocationRule};
pub use resolvers::{DomainKind, DomainRef, DomainResolvers, EntityResolver};
pub use schema::{AcfSchemaBuilder, LazySchema, SchemaAugmenter, SchemaBuilderConfig, SchemaRegistry};
pub use store::{FieldGroupStore, FieldValueStore, InMemoryFieldGroupStore, ValueFormat};
pub use visibility::VisibilityPolicy;

/// Result type for schema augmentation.
pub type Result<T> = std::result::Result<T, AcfError>;
