//! Registry of GraphQL types being assembled.
//!
//! Host types arrive as ready async-graphql objects; generated types are
//! described by their fields. Fields registered onto either kind are held as
//! [`FieldConfig`]s and appended when the registry is handed to the schema
//! builder.

use async_graphql::dynamic::{Object, SchemaBuilder, TypeRef, Union};
use async_graphql::indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::AcfError;
use crate::resolvers::FieldResolver;

/// Type, description and resolver of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub type_ref: TypeRef,
    pub description: String,
    pub resolver: FieldResolver,
}

impl FieldConfig {
    pub fn new(type_ref: TypeRef, description: impl Into<String>, resolver: FieldResolver) -> Self {
        Self {
            type_ref,
            description: description.into(),
            resolver,
        }
    }
}

/// Write access to the schema's type set during augmentation.
pub trait TypeRegistry {
    /// Checks whether an object or union type with this name exists.
    fn exists(&self, type_name: &str) -> bool;

    /// Registers a new object type.
    ///
    /// # Errors
    ///
    /// Returns [`AcfError::DuplicateType`] if the name is taken.
    fn register_object_type(
        &mut self,
        type_name: &str,
        description: &str,
        fields: IndexMap<String, FieldConfig>,
    ) -> Result<(), AcfError>;

    /// Adds a field to an existing type.
    ///
    /// # Errors
    ///
    /// Returns [`AcfError::UnknownType`] for a missing type and
    /// [`AcfError::DuplicateField`] if the field is already present.
    fn register_field(
        &mut self,
        type_name: &str,
        field_name: &str,
        config: FieldConfig,
    ) -> Result<(), AcfError>;
}

struct RegisteredType {
    object: Object,
    /// Fields defined by the host object itself, for duplicate checks.
    host_fields: Vec<String>,
    fields: IndexMap<String, FieldConfig>,
}

/// [`TypeRegistry`] backed by async-graphql dynamic types.
#[derive(Default)]
pub struct SchemaRegistry {
    types: IndexMap<String, RegisteredType>,
    unions: IndexMap<String, Union>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a host object type. `field_names` lists the fields the
    /// object already defines.
    ///
    /// # Errors
    ///
    /// Returns [`AcfError::DuplicateType`] if the name is taken.
    pub fn register_host_object(
        &mut self,
        type_name: &str,
        object: Object,
        field_names: &[&str],
    ) -> Result<(), AcfError> {
        if self.exists(type_name) {
            return Err(AcfError::DuplicateType(type_name.to_string()));
        }
        trace!(type_name = %type_name, "Registering host object type");
        self.types.insert(
            type_name.to_string(),
            RegisteredType {
                object,
                host_fields: field_names.iter().map(|name| name.to_string()).collect(),
                fields: IndexMap::new(),
            },
        );
        Ok(())
    }

    /// Registers a host union type.
    ///
    /// # Errors
    ///
    /// Returns [`AcfError::DuplicateType`] if the name is taken.
    pub fn register_union(&mut self, type_name: &str, union: Union) -> Result<(), AcfError> {
        if self.exists(type_name) {
            return Err(AcfError::DuplicateType(type_name.to_string()));
        }
        self.unions.insert(type_name.to_string(), union);
        Ok(())
    }

    /// Returns the registered config of a field.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldConfig> {
        self.types.get(type_name)?.fields.get(field_name)
    }

    /// Returns the names of the fields registered onto a type, in order.
    pub fn field_names(&self, type_name: &str) -> Vec<&str> {
        self.types
            .get(type_name)
            .map(|ty| ty.fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the number of object and union types.
    pub fn type_count(&self) -> usize {
        self.types.len() + self.unions.len()
    }

    /// Hands every type to the schema builder.
    pub fn into_schema_builder(self, mut builder: SchemaBuilder) -> SchemaBuilder {
        debug!(
            objects = self.types.len(),
            unions = self.unions.len(),
            "Registering augmented types"
        );

        for (_, registered) in self.types {
            let mut object = registered.object;
            for (field_name, config) in registered.fields {
                object = object.field(config.resolver.into_field(
                    &field_name,
                    config.type_ref,
                    &config.description,
                ));
            }
            builder = builder.register(object);
        }

        for (_, union) in self.unions {
            builder = builder.register(union);
        }

        builder
    }
}

impl TypeRegistry for SchemaRegistry {
    fn exists(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name) || self.unions.contains_key(type_name)
    }

    fn register_object_type(
        &mut self,
        type_name: &str,
        description: &str,
        fields: IndexMap<String, FieldConfig>,
    ) -> Result<(), AcfError> {
        if self.exists(type_name) {
            return Err(AcfError::DuplicateType(type_name.to_string()));
        }
        trace!(type_name = %type_name, field_count = fields.len(), "Registering object type");
        self.types.insert(
            type_name.to_string(),
            RegisteredType {
                object: Object::new(type_name).description(description),
                host_fields: Vec::new(),
                fields,
            },
        );
        Ok(())
    }

    fn register_field(
        &mut self,
        type_name: &str,
        field_name: &str,
        config: FieldConfig,
    ) -> Result<(), AcfError> {
        let registered = self
            .types
            .get_mut(type_name)
            .ok_or_else(|| AcfError::UnknownType(type_name.to_string()))?;

        if registered.fields.contains_key(field_name)
            || registered.host_fields.iter().any(|name| name == field_name)
        {
            return Err(AcfError::DuplicateField {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            });
        }

        registered.fields.insert(field_name.to_string(), config);
        Ok(())
    }
}
