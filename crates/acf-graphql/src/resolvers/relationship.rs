//! Identifier to domain object resolution.
//!
//! Relationship-style fields store ids of posts, terms, users or media items.
//! Turning an id into an object is delegated to one host collaborator per
//! kind; this module only normalizes identifiers and preserves ordering.

use std::fmt;
use std::sync::Arc;

use async_graphql::Value;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Kind of domain entity an identifier points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    Post,
    Term,
    User,
    Media,
}

/// A resolved handle to a host entity.
///
/// Used as the parent value of host object types, which makes it the
/// "domain object" root for field resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRef {
    pub kind: DomainKind,
    /// Stable database identifier.
    pub id: u64,
    /// Concrete GraphQL type, e.g. `Page` inside `PostObjectUnion`.
    pub type_name: String,
}

impl DomainRef {
    pub fn new(kind: DomainKind, id: u64, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            type_name: type_name.into(),
        }
    }

    /// Recognizes a post that is already realized inside a raw value.
    ///
    /// Stores may hand back `{"id": 12, "__typename": "Page"}` instead of a
    /// bare id; such values are used as-is rather than looked up again.
    pub fn from_realized(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let id = map.get("id").and_then(parse_identifier)?;
        let type_name = match map.get("__typename") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return None,
        };
        Some(Self::new(DomainKind::Post, id, type_name))
    }
}

/// Host collaborator loading one kind of entity by id.
#[async_trait]
pub trait EntityResolver: Send + Sync {
    async fn resolve_by_id(&self, id: u64) -> Option<DomainRef>;
}

/// The four entity resolvers, one per [`DomainKind`].
#[derive(Clone)]
pub struct DomainResolvers {
    pub post: Arc<dyn EntityResolver>,
    pub term: Arc<dyn EntityResolver>,
    pub user: Arc<dyn EntityResolver>,
    pub media: Arc<dyn EntityResolver>,
}

impl DomainResolvers {
    /// Returns the collaborator for a kind.
    pub fn for_kind(&self, kind: DomainKind) -> &dyn EntityResolver {
        match kind {
            DomainKind::Post => self.post.as_ref(),
            DomainKind::Term => self.term.as_ref(),
            DomainKind::User => self.user.as_ref(),
            DomainKind::Media => self.media.as_ref(),
        }
    }
}

impl fmt::Debug for DomainResolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainResolvers")
            .field("post", &"EntityResolver")
            .field("term", &"EntityResolver")
            .field("user", &"EntityResolver")
            .field("media", &"EntityResolver")
            .finish()
    }
}

/// Resolves raw identifier values into [`DomainRef`]s.
pub struct RelationshipResolver<'a> {
    resolvers: &'a DomainResolvers,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(resolvers: &'a DomainResolvers) -> Self {
        Self { resolvers }
    }

    /// Resolves a single identifier; invalid or unknown ids give `None`.
    pub async fn resolve_one(&self, identifier: &Value, kind: DomainKind) -> Option<DomainRef> {
        let id = parse_identifier(identifier)?;
        let resolved = self.resolvers.for_kind(kind).resolve_by_id(id).await;
        if resolved.is_none() {
            trace!(id, ?kind, "Identifier did not resolve");
        }
        resolved
    }

    /// Resolves identifiers in order, dropping invalid and unresolvable ones.
    pub async fn resolve_many(&self, identifiers: &[Value], kind: DomainKind) -> Vec<DomainRef> {
        let mut resolved = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            if let Some(domain_ref) = self.resolve_one(identifier, kind).await {
                resolved.push(domain_ref);
            }
        }
        resolved
    }
}

/// Parses a positive integer id from a number or numeric string.
pub fn parse_identifier(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Resolves every id except 404 to a post of type `Post`.
    struct StubResolver {
        kind: DomainKind,
        type_name: &'static str,
    }

    #[async_trait]
    impl EntityResolver for StubResolver {
        async fn resolve_by_id(&self, id: u64) -> Option<DomainRef> {
            (id != 404).then(|| DomainRef::new(self.kind, id, self.type_name))
        }
    }

    fn resolvers() -> DomainResolvers {
        DomainResolvers {
            post: Arc::new(StubResolver {
                kind: DomainKind::Post,
                type_name: "Post",
            }),
            term: Arc::new(StubResolver {
                kind: DomainKind::Term,
                type_name: "Category",
            }),
            user: Arc::new(StubResolver {
                kind: DomainKind::User,
                type_name: "User",
            }),
            media: Arc::new(StubResolver {
                kind: DomainKind::Media,
                type_name: "MediaItem",
            }),
        }
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(parse_identifier(&Value::from(5)), Some(5));
        assert_eq!(parse_identifier(&Value::from(" 12 ")), Some(12));
        assert_eq!(parse_identifier(&Value::from(0)), None);
        assert_eq!(parse_identifier(&Value::from("")), None);
        assert_eq!(parse_identifier(&Value::from(-3)), None);
        assert_eq!(parse_identifier(&Value::from("abc")), None);
        assert_eq!(parse_identifier(&Value::Null), None);
    }

    #[tokio::test]
    async fn test_resolve_many_drops_falsy_ids() {
        let resolvers = resolvers();
        let relationship = RelationshipResolver::new(&resolvers);
        let ids = vec![Value::from(5), Value::from(0), Value::from(""), Value::from(9)];

        let resolved = relationship.resolve_many(&ids, DomainKind::Post).await;
        let resolved_ids: Vec<u64> = resolved.iter().map(|r| r.id).collect();
        assert_eq!(resolved_ids, vec![5, 9]);
    }

    #[tokio::test]
    async fn test_resolve_many_drops_unresolved() {
        let resolvers = resolvers();
        let relationship = RelationshipResolver::new(&resolvers);
        let ids = vec![Value::from(404), Value::from("7")];

        let resolved = relationship.resolve_many(&ids, DomainKind::Term).await;
        assert_eq!(resolved, vec![DomainRef::new(DomainKind::Term, 7, "Category")]);
    }

    #[tokio::test]
    async fn test_resolve_one_uses_kind_collaborator() {
        let resolvers = resolvers();
        let relationship = RelationshipResolver::new(&resolvers);

        let user = relationship
            .resolve_one(&Value::from(3), DomainKind::User)
            .await
            .unwrap();
        assert_eq!(user.type_name, "User");
        assert!(
            relationship
                .resolve_one(&Value::from(404), DomainKind::Media)
                .await
                .is_none()
        );
    }

    #[test]
    fn test_from_realized() {
        let value = serde_json::from_value::<Value>(serde_json::json!({
            "id": 12,
            "__typename": "Page"
        }))
        .unwrap();
        assert_eq!(
            DomainRef::from_realized(&value),
            Some(DomainRef::new(DomainKind::Post, 12, "Page"))
        );
        assert_eq!(DomainRef::from_realized(&Value::from(12)), None);
    }
}
