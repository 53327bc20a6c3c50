//! Segment-wise path patterns built from a resource tree.
//!
//! A pattern is a sequence of literal resource names and identifier slots,
//! e.g. `targets / 1 / subs / *`. A request path matches when it has exactly
//! as many segments as the pattern and every segment satisfies its matcher.

use std::fmt;

/// Constraint on an identifier segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierMatcher {
    /// Matches only a segment equal to the value
    Exact(String),
    /// Matches any non-empty segment
    Any,
}

impl IdentifierMatcher {
    /// Token used for the wildcard identifier in configuration documents.
    pub const ANY_TOKEN: &'static str = "*";

    /// Parse the configuration form: `*` is the wildcard, anything else exact.
    pub fn parse(value: &str) -> Self {
        if value == Self::ANY_TOKEN {
            IdentifierMatcher::Any
        } else {
            IdentifierMatcher::Exact(value.to_string())
        }
    }

    pub fn matches(&self, segment: &str) -> bool {
        match self {
            IdentifierMatcher::Exact(expected) => segment == expected,
            IdentifierMatcher::Any => !segment.is_empty(),
        }
    }
}

impl fmt::Display for IdentifierMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierMatcher::Exact(value) => f.write_str(value),
            IdentifierMatcher::Any => f.write_str(Self::ANY_TOKEN),
        }
    }
}

/// One position in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegmentMatcher {
    /// Resource name, compared case-sensitively
    Literal(String),
    /// Identifier of the named resource
    Identifier {
        resource: String,
        matcher: IdentifierMatcher,
    },
}

impl PathSegmentMatcher {
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            PathSegmentMatcher::Literal(name) => segment == name,
            PathSegmentMatcher::Identifier { matcher, .. } => matcher.matches(segment),
        }
    }
}

/// Ordered segment matchers for one compiled route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<PathSegmentMatcher>,
}

impl PathPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend with a literal resource name.
    pub fn literal(mut self, name: &str) -> Self {
        self.segments
            .push(PathSegmentMatcher::Literal(name.to_string()));
        self
    }

    /// Extend with an identifier slot belonging to `resource`.
    pub fn identifier(mut self, resource: &str, matcher: IdentifierMatcher) -> Self {
        self.segments.push(PathSegmentMatcher::Identifier {
            resource: resource.to_string(),
            matcher,
        });
        self
    }

    pub fn segments(&self) -> &[PathSegmentMatcher] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn matches(&self, segments: &[String]) -> bool {
        segments.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(segments)
                .all(|(matcher, segment)| matcher.matches(segment))
    }

    /// Bind identifier values by resource name. Returns `None` if the path
    /// does not match.
    pub fn captures(&self, segments: &[String]) -> Option<PathParams> {
        if !self.matches(segments) {
            return None;
        }

        let mut params = PathParams::default();
        for (matcher, segment) in self.segments.iter().zip(segments) {
            if let PathSegmentMatcher::Identifier { resource, .. } = matcher {
                params.push(resource, segment);
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                PathSegmentMatcher::Literal(name) => write!(f, "/{name}")?,
                PathSegmentMatcher::Identifier { matcher, .. } => write!(f, "/{matcher}")?,
            }
        }
        Ok(())
    }
}

/// Identifier values captured from a matched path, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, resource: &str, value: &str) {
        self.entries.push((resource.to_string(), value.to_string()));
    }

    /// Identifier bound for `resource`. When the same resource name appears at
    /// several depths the innermost binding wins.
    pub fn get(&self, resource: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == resource)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
