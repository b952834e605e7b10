//! Endpoint visibility table
//!
//! Decides, from the request path alone, whether a bearer token may be
//! attached. Public routes must keep working for anonymous callers, so they
//! never receive the header, even when a stale token is registered.

/// Whether a route may carry the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Never carries an Authorization header
    Public,
    /// Carries an Authorization header when a token is available
    Protected,
}

/// A path pattern in the visibility table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Matches any path starting with the prefix
    Prefix(String),
    /// Matches `<prefix><segment>` where the segment is non-empty and has no `/`
    SingleSegment(String),
}

impl RoutePattern {
    /// Check whether the normalized path matches
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
            Self::SingleSegment(prefix) => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
        }
    }
}

/// Ordered route patterns; anything unmatched is protected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    rules: Vec<(RoutePattern, Visibility)>,
}

/// Recipe search endpoint
pub const SEARCH_PATH: &str = "/recipes/search";

/// Prefix of the recipe-by-id endpoint
pub const RECIPE_PREFIX: &str = "/recipes/";

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
            .with_rule(RoutePattern::Prefix(SEARCH_PATH.to_string()), Visibility::Public)
            .with_rule(
                RoutePattern::SingleSegment(RECIPE_PREFIX.to_string()),
                Visibility::Public,
            )
    }
}

impl RouteTable {
    /// A table where every route is protected
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Builder-style method to append a rule
    #[must_use]
    pub fn with_rule(mut self, pattern: RoutePattern, visibility: Visibility) -> Self {
        self.rules.push((pattern, visibility));
        self
    }

    /// Visibility of a normalized path (leading slash, query included).
    ///
    /// The first matching rule wins.
    #[must_use]
    pub fn classify(&self, path: &str) -> Visibility {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map_or(Visibility::Protected, |(_, visibility)| *visibility)
    }

    /// Check whether a path is public
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        self.classify(path) == Visibility::Public
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_public() {
        let table = RouteTable::default();
        assert!(table.is_public("/recipes/search"));
        assert!(table.is_public("/recipes/search?q=pasta"));
        assert!(table.is_public("/recipes/search?q="));
    }

    #[test]
    fn test_recipe_by_id_is_public() {
        let table = RouteTable::default();
        assert!(table.is_public("/recipes/42"));
        assert!(table.is_public("/recipes/abc-def"));
    }

    #[test]
    fn test_everything_else_is_protected() {
        let table = RouteTable::default();
        for path in [
            "/recipes/",
            "/recipes",
            "/recipes/42/reviews",
            "/users/me/saved",
            "/users/me/saved/42",
            "/auth/login",
            "/auth/signup",
            "/health",
            "/",
        ] {
            assert_eq!(table.classify(path), Visibility::Protected, "{path}");
        }
    }

    #[test]
    fn test_classification_is_pure() {
        let table = RouteTable::default();
        let before = table.clone();
        for _ in 0..3 {
            assert!(table.is_public("/recipes/7"));
        }
        assert_eq!(table, before);
    }

    #[test]
    fn test_custom_rules() {
        let table = RouteTable::empty()
            .with_rule(RoutePattern::Prefix("/auth/".to_string()), Visibility::Public);
        assert!(table.is_public("/auth/login"));
        assert!(!table.is_public("/recipes/search"));
    }
}
