//! Path pattern matching
//!
//! Patterns are literal segments plus single-segment named parameters
//! (`/api/users/:id`). No wildcards, no prefix matching: a pattern matches a
//! path only when every segment lines up.

use std::collections::HashMap;

/// One segment of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled method-agnostic path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern string. Segments starting with `:` become named
    /// parameters; a bare `:` stays a literal.
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .map(|seg| match seg.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(seg.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Match a request path against this pattern, capturing parameters.
    ///
    /// Trailing slashes are significant: `/about` and `/about/` are
    /// different paths.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let pattern = PathPattern::parse("/api/hello");
        assert!(pattern.matches("/api/hello").is_some());
        assert!(pattern.matches("/api/hello/").is_none());
        assert!(pattern.matches("/api/hellos").is_none());
        assert!(pattern.matches("/api").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("/api/users/:id");
        let params = pattern.matches("/api/users/42").expect("should match");
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(pattern.matches("/api/users").is_none());
        assert!(pattern.matches("/api/users/42/posts").is_none());
    }

    #[test]
    fn test_multiple_params() {
        let pattern = PathPattern::parse("/users/:user/posts/:post");
        let params = pattern.matches("/users/alice/posts/7").expect("should match");
        assert_eq!(params.get("user").map(String::as_str), Some("alice"));
        assert_eq!(params.get("post").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_param_matches_single_segment_only() {
        let pattern = PathPattern::parse("/files/:name");
        assert!(pattern.matches("/files/a/b").is_none());
        // An empty segment still counts as one segment
        let params = pattern.matches("/files/").expect("should match");
        assert_eq!(params.get("name").map(String::as_str), Some(""));
    }

    #[test]
    fn test_bare_colon_is_literal() {
        let pattern = PathPattern::parse("/odd/:");
        assert!(pattern.matches("/odd/:").is_some());
        assert!(pattern.matches("/odd/x").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/x").is_none());
    }
}
