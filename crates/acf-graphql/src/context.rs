//! Runtime collaborators for augmented field resolvers.
//!
//! The context is attached to the schema as data and read by every
//! [`FieldResolver`](crate::resolvers::FieldResolver) at query time.
//!
//! # Example
//!
//! ```ignore
//! use acf_graphql::AcfContext;
//!
//! let context = AcfContext::new(value_store.clone(), resolvers.clone());
//! let builder = AcfSchemaBuilder::new(entity_types, group_store, context, config);
//! ```

use std::fmt;

use crate::resolvers::DomainResolvers;
use crate::store::DynFieldValueStore;

/// Dependencies needed by field resolvers.
#[derive(Clone)]
pub struct AcfContext {
    /// Field value storage (raw and formatted accessors).
    pub store: DynFieldValueStore,

    /// Id-to-entity collaborators for relationship fields.
    pub resolvers: DomainResolvers,
}

impl AcfContext {
    #[must_use]
    pub fn new(store: DynFieldValueStore, resolvers: DomainResolvers) -> Self {
        Self { store, resolvers }
    }
}

impl fmt::Debug for AcfContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcfContext")
            .field("store", &"FieldValueStore")
            .field("resolvers", &self.resolvers)
            .finish()
    }
}
