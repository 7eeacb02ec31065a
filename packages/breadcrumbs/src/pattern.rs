//! Positional route patterns.

use std::{
    borrow::Cow,
    fmt::{self, Display},
};

use tracing::trace;
use urlencoding::{decode, encode};

use crate::params::RouteParams;

/// Split a path into its non-empty segments.
///
/// Leading, trailing and repeated slashes are insignificant.
///
/// ```rust
/// # use carlot_breadcrumbs::pattern::segments;
/// assert_eq!(segments("//vehicles/42/").collect::<Vec<_>>(), ["vehicles", "42"]);
/// ```
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Percent-decode a path segment. Segments that don't decode to UTF-8 are kept as they are.
pub(crate) fn decode_segment(segment: &str) -> Cow<'_, str> {
    decode(segment).unwrap_or(Cow::Borrowed(segment))
}

/// A single token of a [`RoutePattern`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathToken {
    /// A segment that must equal the path segment exactly.
    Literal(String),
    /// A `:name` segment that matches any path segment and captures it.
    Param(String),
}

impl PathToken {
    fn parse(token: &str) -> Self {
        match token.strip_prefix(':') {
            Some(name) if !name.is_empty() => Self::Param(name.to_string()),
            _ => Self::Literal(token.to_string()),
        }
    }
}

impl Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Param(name) => write!(f, ":{name}"),
        }
    }
}

/// A path template made of literal and named-parameter tokens, e.g. `/vehicles/:id`.
///
/// Matching is strictly positional: there are no wildcards, optional segments or catch-alls.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    tokens: Vec<PathToken>,
}

impl RoutePattern {
    /// Parse a pattern. Empty tokens are dropped, so `/a/:id/` and `a/:id` are the same pattern.
    pub fn parse(pattern: &str) -> Self {
        Self {
            tokens: segments(pattern).map(PathToken::parse).collect(),
        }
    }

    /// The tokens of this pattern, in order.
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    /// The names of all parameters, in order of appearance.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            PathToken::Param(name) => Some(name.as_str()),
            PathToken::Literal(_) => None,
        })
    }

    /// Match `path` against this pattern.
    ///
    /// Returns [`None`] if the number of segments differs or any literal differs
    /// (case-sensitive). Otherwise returns every captured parameter in pattern order,
    /// percent-decoded.
    ///
    /// ```rust
    /// # use carlot_breadcrumbs::pattern::RoutePattern;
    /// let pattern = RoutePattern::parse("/a/:id/b");
    /// let params = pattern.matches("/a/42/b").unwrap();
    /// assert_eq!(params.get("id"), Some("42"));
    /// assert!(pattern.matches("/a/42").is_none());
    /// ```
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let path: Vec<&str> = segments(path).collect();
        if path.len() != self.tokens.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (token, segment) in self.tokens.iter().zip(path) {
            match token {
                PathToken::Literal(literal) if literal != segment => {
                    trace!(pattern = %self, %literal, segment, "literal mismatch");
                    return None;
                }
                PathToken::Literal(_) => {}
                PathToken::Param(name) => {
                    params.push(name.clone(), decode_segment(segment).into_owned())
                }
            }
        }

        Some(params)
    }

    /// Build the path for the sibling of `current_path` where parameter `key` has `value`.
    ///
    /// Every segment is taken positionally from `current_path`; only the segment at the index of
    /// the `key` token is replaced, with the raw `value` URL-encoded. Returns [`None`] if `current_path`
    /// doesn't match this pattern or `key` isn't one of its parameters.
    ///
    /// ```rust
    /// # use carlot_breadcrumbs::pattern::RoutePattern;
    /// let pattern = RoutePattern::parse("/vehicles/:id");
    /// assert_eq!(pattern.substitute("/vehicles/42", "id", "99").as_deref(), Some("/vehicles/99"));
    /// ```
    pub fn substitute(&self, current_path: &str, key: &str, value: &str) -> Option<String> {
        self.matches(current_path)?;

        let index = self
            .tokens
            .iter()
            .position(|token| matches!(token, PathToken::Param(name) if name == key))?;

        let mut path = String::new();
        for (i, segment) in segments(current_path).enumerate() {
            path.push('/');
            if i == index {
                path.push_str(&encode(value));
            } else {
                path.push_str(segment);
            }
        }

        Some(path)
    }
}

impl Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return write!(f, "/");
        }
        for token in &self.tokens {
            write!(f, "/{token}")?;
        }
        Ok(())
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}
