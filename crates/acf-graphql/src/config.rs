//! Augmentation configuration.
//!
//! Configuration can be specified in a TOML file under the `[acf]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [acf]
//! max_nesting_depth = 8
//! default_field_description = "Custom field"
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AcfError;
use crate::schema::SchemaBuilderConfig;

/// Schema augmentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcfConfig {
    /// Maximum nesting of group/repeater fields that will be expanded.
    /// Deeper composite fields keep their generated type but get no sub-fields.
    /// Default: 16
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Description used for fields without instructions.
    #[serde(default = "default_field_description")]
    pub default_field_description: String,

    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_max_nesting_depth() -> usize {
    16
}

fn default_field_description() -> String {
    "ACF Field added to the Schema by WPGraphQL ACF".to_string()
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for AcfConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
            default_field_description: default_field_description(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl AcfConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AcfError::InvalidConfig`] if a value is out of range.
    pub fn validate(&self) -> Result<(), AcfError> {
        if self.max_nesting_depth == 0 {
            return Err(AcfError::InvalidConfig(
                "acf.max_nesting_depth must be > 0".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(AcfError::InvalidConfig("acf.max_depth must be > 0".into()));
        }
        if self.max_complexity == 0 {
            return Err(AcfError::InvalidConfig(
                "acf.max_complexity must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Converts this config to a SchemaBuilderConfig.
    #[must_use]
    pub fn to_schema_builder_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig {
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
        }
    }
}
