//! Error types for schema augmentation.
//!
//! Missing names, unknown kinds and empty field lists are not errors: the
//! augmenter skips them and logs. The variants below cover the registry
//! contract and the schema build around it.

use thiserror::Error;

/// Errors raised while building the augmented GraphQL schema.
#[derive(Debug, Error)]
pub enum AcfError {
    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A field was registered onto a type the registry does not know.
    #[error("Unknown GraphQL type: {0}")]
    UnknownType(String),

    /// A type name was registered twice.
    #[error("GraphQL type {0} is already registered")]
    DuplicateType(String),

    /// A field name was registered twice on the same type.
    #[error("Field {type_name}.{field_name} is already registered")]
    DuplicateField {
        /// Type owning the field.
        type_name: String,
        /// Name of the field.
        field_name: String,
    },

    /// A field group export could not be parsed.
    #[error("Invalid field group export: {0}")]
    Export(#[from] serde_json::Error),

    /// Schema is still being built - client should retry.
    #[error("GraphQL schema is initializing, please retry")]
    SchemaInitializing,

    /// async-graphql rejected the assembled schema.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),
}

impl AcfError {
    /// Returns the error code used in logs and GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnknownType(_) => "UNKNOWN_TYPE",
            Self::DuplicateType(_) => "DUPLICATE_TYPE",
            Self::DuplicateField { .. } => "DUPLICATE_FIELD",
            Self::Export(_) => "INVALID_EXPORT",
            Self::SchemaInitializing => "SCHEMA_INITIALIZING",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
        }
    }

    /// Returns true for errors the augmenter treats as "already done".
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateType(_) | Self::DuplicateField { .. })
    }
}
