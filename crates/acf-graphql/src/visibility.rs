//! Schema exposure rules for field groups and fields.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::model::{FieldDefinition, FieldGroup};

/// Override hook: receives the computed decision and the group, returns the
/// decision to use.
pub type VisibilityFilter = Arc<dyn Fn(bool, &FieldGroup) -> bool + Send + Sync>;

/// Decides which field groups are exposed to the GraphQL schema.
///
/// Exposure is opt-in: a group must set `show_in_graphql`. Root groups
/// additionally need to be active and carry at least one location rule.
/// Registered filters run in order and may change the outcome.
#[derive(Clone, Default)]
pub struct VisibilityPolicy {
    filters: Vec<VisibilityFilter>,
}

impl VisibilityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an override filter.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(bool, &FieldGroup) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Whether the group's fields should be registered.
    pub fn should_expose(&self, group: &FieldGroup) -> bool {
        let mut show = group.show_in_graphql == Some(true);

        if !group.is_nested() && (group.active != Some(true) || group.location.is_empty()) {
            show = false;
        }

        let decision = self
            .filters
            .iter()
            .fold(show, |decision, filter| filter(decision, group));

        trace!(group = %group.key, computed = show, decision, "Field group visibility");
        decision
    }

    /// Whether a single field should be registered.
    pub fn field_is_exposed(&self, field: &FieldDefinition) -> bool {
        field.is_exposed()
    }
}

impl fmt::Debug for VisibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityPolicy")
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, LocationRule};

    fn root_group(active: Option<bool>, show: Option<bool>) -> FieldGroup {
        FieldGroup {
            key: "group_1".into(),
            active,
            show_in_graphql: show,
            location: vec![vec![LocationRule {
                param: "post_type".into(),
                operator: "==".into(),
                value: "post".into(),
            }]],
            ..FieldGroup::default()
        }
    }

    #[test]
    fn test_hidden_by_default() {
        let policy = VisibilityPolicy::new();
        assert!(!policy.should_expose(&root_group(Some(true), None)));
        assert!(policy.should_expose(&root_group(Some(true), Some(true))));
    }

    #[test]
    fn test_inactive_root_group_hidden() {
        let policy = VisibilityPolicy::new();
        assert!(!policy.should_expose(&root_group(Some(false), Some(true))));
        assert!(!policy.should_expose(&root_group(None, Some(true))));
    }

    #[test]
    fn test_root_group_without_location_hidden() {
        let policy = VisibilityPolicy::new();
        let mut group = root_group(Some(true), Some(true));
        group.location.clear();
        assert!(!policy.should_expose(&group));
    }

    #[test]
    fn test_nested_group_skips_root_checks() {
        let policy = VisibilityPolicy::new();
        let group = FieldGroup {
            key: "field_5".into(),
            show_in_graphql: Some(true),
            parent: Some("field_5".into()),
            ..FieldGroup::default()
        };
        assert!(policy.should_expose(&group));
    }

    #[test]
    fn test_filters_override_in_order() {
        let policy = VisibilityPolicy::new()
            .with_filter(|_, group| group.key == "group_1")
            .with_filter(|decision, _| decision);
        assert!(policy.should_expose(&root_group(Some(false), None)));

        let deny = VisibilityPolicy::new().with_filter(|_, _| false);
        assert!(!deny.should_expose(&root_group(Some(true), Some(true))));
    }

    #[test]
    fn test_field_visibility() {
        let policy = VisibilityPolicy::new();
        let mut field = FieldDefinition::new("field_1", "title", FieldKind::Text);
        assert!(policy.field_is_exposed(&field));
        field.show_in_graphql = Some(false);
        assert!(!policy.field_is_exposed(&field));
        field.show_in_graphql = Some(true);
        assert!(policy.field_is_exposed(&field));
    }
}
