//! Cache addressing: query keys and invalidation tags.

use std::fmt;

/// Address of one cache entry: an endpoint plus its effective parameter.
///
/// Identical keys always address the same entry. `("search", "")` is a real
/// key distinct from any other search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub endpoint: String,
    pub param: String,
}

impl QueryKey {
    pub fn new(endpoint: impl Into<String>, param: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), param: param.into() }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.endpoint, self.param)
    }
}

/// Which member of a tag family a tag names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagId {
    /// The collection as a whole.
    List,
    /// One item, by its identifying value.
    Item(String),
}

/// Label attached to cache entries so mutations can invalidate them in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: String,
    pub id: TagId,
}

impl Tag {
    pub fn list(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), id: TagId::List }
    }

    pub fn item(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self { kind: kind.into(), id: TagId::Item(id.into()) }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            TagId::List => write!(f, "{}:LIST", self.kind),
            TagId::Item(id) => write!(f, "{}:{}", self.kind, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_display() {
        assert_eq!(QueryKey::new("search", "ada lovelace").to_string(), r#"search("ada lovelace")"#);
        assert_eq!(QueryKey::new("articles", "").to_string(), r#"articles("")"#);
    }

    #[test]
    fn test_distinct_params_are_distinct_keys() {
        let keys: HashSet<QueryKey> =
            [QueryKey::new("search", ""), QueryKey::new("search", "rust"), QueryKey::new("search", "rust")]
                .into_iter()
                .collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(Tag::list("Articles").to_string(), "Articles:LIST");
        assert_eq!(Tag::item("Articles", "Ada Lovelace").to_string(), "Articles:Ada Lovelace");
    }

    #[test]
    fn test_item_named_list_is_not_the_list_tag() {
        assert_ne!(Tag::item("Articles", "LIST"), Tag::list("Articles"));
    }
}
