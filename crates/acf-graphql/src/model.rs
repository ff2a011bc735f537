//! Field group and field declarations.
//!
//! These mirror the ACF JSON export format: a field group holds an ordered
//! list of fields, location rules and activation flags; a field carries its
//! ACF `type` and, for composite kinds, nested `sub_fields`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolvers::DomainKind;

/// One location rule, e.g. `post_type == page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub param: String,
    pub operator: String,
    pub value: String,
}

/// A named collection of field declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldGroup {
    pub key: String,

    #[serde(default)]
    pub title: String,

    /// Embedded fields. Empty when the store keeps fields separately.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    #[serde(default)]
    pub active: Option<bool>,

    /// Rule groups; the outer list is OR-ed, inner lists are AND-ed.
    #[serde(default)]
    pub location: Vec<Vec<LocationRule>>,

    #[serde(default)]
    pub show_in_graphql: Option<bool>,

    /// Key of the composite field owning this group, for nested groups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl FieldGroup {
    /// Builds the nested group formed by a composite field's sub-fields.
    ///
    /// Nested groups inherit exposure from the field that contains them.
    pub fn nested(field: &FieldDefinition) -> Self {
        Self {
            key: field.key.clone(),
            title: field.label.clone(),
            fields: field.sub_fields.clone(),
            active: None,
            location: Vec::new(),
            show_in_graphql: Some(field.is_exposed()),
            parent: Some(field.key.clone()),
        }
    }

    /// Whether this group is nested inside a composite field.
    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }
}

/// One typed, named unit of data inside a field group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: FieldKind,

    #[serde(default)]
    pub show_in_graphql: Option<bool>,

    #[serde(default)]
    pub instructions: Option<String>,

    #[serde(default)]
    pub sub_fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// Creates a field with the given key, name and kind.
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            key: key.into(),
            label: name.clone(),
            name,
            kind,
            show_in_graphql: None,
            instructions: None,
            sub_fields: Vec::new(),
        }
    }

    /// Adds sub-fields (for group and repeater kinds).
    #[must_use]
    pub fn with_sub_fields(mut self, sub_fields: Vec<FieldDefinition>) -> Self {
        self.sub_fields = sub_fields;
        self
    }

    /// Fields are exposed unless explicitly hidden.
    pub fn is_exposed(&self) -> bool {
        self.show_in_graphql != Some(false)
    }
}

/// The declared ACF field type.
///
/// Unknown type names parse into [`FieldKind::Unsupported`] so that a new
/// ACF field type never breaks deserialization of an export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    Textarea,
    Wysiwyg,
    Email,
    Url,
    Password,
    ColorPicker,
    ButtonGroup,
    Oembed,
    Message,
    Number,
    TrueFalse,
    DatePicker,
    TimePicker,
    DateTimePicker,
    Checkbox,
    PostObject,
    PageLink,
    Relationship,
    Image,
    File,
    Gallery,
    User,
    Taxonomy,
    Link,
    GoogleMap,
    Accordion,
    Group,
    Repeater,
    FlexibleContent,
    #[default]
    Missing,
    Unsupported(String),
}

impl FieldKind {
    /// Returns the ACF type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Wysiwyg => "wysiwyg",
            Self::Email => "email",
            Self::Url => "url",
            Self::Password => "password",
            Self::ColorPicker => "color_picker",
            Self::ButtonGroup => "button_group",
            Self::Oembed => "oembed",
            Self::Message => "message",
            Self::Number => "number",
            Self::TrueFalse => "true_false",
            Self::DatePicker => "date_picker",
            Self::TimePicker => "time_picker",
            Self::DateTimePicker => "date_time_picker",
            Self::Checkbox => "checkbox",
            Self::PostObject => "post_object",
            Self::PageLink => "page_link",
            Self::Relationship => "relationship",
            Self::Image => "image",
            Self::File => "file",
            Self::Gallery => "gallery",
            Self::User => "user",
            Self::Taxonomy => "taxonomy",
            Self::Link => "link",
            Self::GoogleMap => "google_map",
            Self::Accordion => "accordion",
            Self::Group => "group",
            Self::Repeater => "repeater",
            Self::FlexibleContent => "flexible_content",
            Self::Missing => "",
            Self::Unsupported(other) => other,
        }
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "wysiwyg" => Self::Wysiwyg,
            "email" => Self::Email,
            "url" => Self::Url,
            "password" => Self::Password,
            "color_picker" => Self::ColorPicker,
            "button_group" => Self::ButtonGroup,
            "oembed" => Self::Oembed,
            "message" => Self::Message,
            "number" => Self::Number,
            "true_false" => Self::TrueFalse,
            "date_picker" => Self::DatePicker,
            "time_picker" => Self::TimePicker,
            "date_time_picker" => Self::DateTimePicker,
            "checkbox" => Self::Checkbox,
            "post_object" => Self::PostObject,
            "page_link" => Self::PageLink,
            "relationship" => Self::Relationship,
            "image" => Self::Image,
            "file" => Self::File,
            "gallery" => Self::Gallery,
            "user" => Self::User,
            "taxonomy" => Self::Taxonomy,
            "link" => Self::Link,
            "google_map" => Self::GoogleMap,
            "accordion" => Self::Accordion,
            "group" => Self::Group,
            "repeater" => Self::Repeater,
            "flexible_content" => Self::FlexibleContent,
            "" => Self::Missing,
            _ => Self::Unsupported(value),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity type of the host schema that field groups can attach to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    /// Key used to look up field groups, e.g. `post` or `category`.
    pub key: String,
    /// GraphQL object type name, e.g. `Post`.
    pub type_name: String,
    /// Which resolver collaborator loads entities of this type.
    pub kind: DomainKind,
}

impl EntityType {
    pub fn new(key: impl Into<String>, type_name: impl Into<String>, kind: DomainKind) -> Self {
        Self {
            key: key.into(),
            type_name: type_name.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip_names() {
        assert_eq!(FieldKind::from("date_time_picker"), FieldKind::DateTimePicker);
        assert_eq!(FieldKind::from("google_map").as_str(), "google_map");
        assert_eq!(
            FieldKind::from("range"),
            FieldKind::Unsupported("range".to_string())
        );
        assert_eq!(FieldKind::from(""), FieldKind::Missing);
    }

    #[test]
    fn test_deserialize_field_group_export() {
        let group: FieldGroup = serde_json::from_value(json!({
            "key": "group_hero",
            "title": "Hero",
            "active": true,
            "show_in_graphql": true,
            "location": [[{"param": "post_type", "operator": "==", "value": "page"}]],
            "fields": [
                {"key": "field_1", "label": "Title", "name": "hero_title", "type": "text"},
                {"key": "field_2", "name": "slides", "type": "repeater", "sub_fields": [
                    {"key": "field_3", "name": "caption", "type": "textarea", "show_in_graphql": false}
                ]},
                {"key": "field_4", "name": "legacy", "type": "range"}
            ]
        }))
        .unwrap();

        assert_eq!(group.fields.len(), 3);
        assert_eq!(group.fields[0].kind, FieldKind::Text);
        assert_eq!(group.fields[1].sub_fields.len(), 1);
        assert!(!group.fields[1].sub_fields[0].is_exposed());
        assert_eq!(
            group.fields[2].kind,
            FieldKind::Unsupported("range".into())
        );
        assert_eq!(group.location[0][0].value, "page");
        assert!(!group.is_nested());
    }

    #[test]
    fn test_nested_group_inherits_field() {
        let field = FieldDefinition::new("field_9", "address", FieldKind::Group).with_sub_fields(
            vec![FieldDefinition::new("field_10", "city", FieldKind::Text)],
        );
        let nested = FieldGroup::nested(&field);
        assert!(nested.is_nested());
        assert_eq!(nested.parent.as_deref(), Some("field_9"));
        assert_eq!(nested.show_in_graphql, Some(true));
        assert_eq!(nested.fields.len(), 1);
    }
}
