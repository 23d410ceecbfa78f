//! Route matching module
//!
//! Matches a request method and path against an ordered route table.
//! Templates are split into `/`-separated segments; `{name}` captures a
//! segment and `{name:digits}` captures it only if it is all ASCII digits.

use hyper::Method;
use std::fmt;

/// Which request methods a route accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatch {
    /// Any method (the path alone decides)
    Any,
    /// Exactly this method
    Only(Method),
}

impl MethodMatch {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(expected) => expected == method,
        }
    }
}

impl fmt::Display for MethodMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.pad("*"),
            Self::Only(method) => f.pad(method.as_str()),
        }
    }
}

/// One segment of a path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    Param {
        name: &'static str,
        digits_only: bool,
    },
}

impl Segment {
    fn parse(raw: &'static str) -> Self {
        let Some(inner) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            return Self::Literal(raw);
        };

        match inner.split_once(':') {
            Some((name, "digits")) => Self::Param {
                name,
                digits_only: true,
            },
            _ => Self::Param {
                name: inner,
                digits_only: false,
            },
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Literal(literal) => *literal == value,
            Self::Param { digits_only, .. } => {
                !value.is_empty() && (!digits_only || value.bytes().all(|b| b.is_ascii_digit()))
            }
        }
    }
}

/// A parsed path template such as `/api/v1/products/{id:digits}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: &'static str,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(template: &'static str) -> Self {
        let trimmed = template.strip_prefix('/').unwrap_or(template);
        Self {
            raw: template,
            segments: trimmed.split('/').map(Segment::parse).collect(),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        self.raw
    }

    /// Match `path` segment by segment. No normalization is applied, so a
    /// trailing slash produces an extra empty segment and fails to match.
    pub fn matches<'p>(&self, path: &'p str) -> Option<PathParams<'p>> {
        let trimmed = path.strip_prefix('/')?;
        let mut params = PathParams::default();
        let mut parts = trimmed.split('/');

        for segment in &self.segments {
            let value = parts.next()?;
            if !segment.accepts(value) {
                return None;
            }
            if let Segment::Param { name, .. } = segment {
                params.pairs.push((name, value));
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// Named values captured from a matched path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams<'p> {
    pairs: Vec<(&'static str, &'p str)>,
}

impl<'p> PathParams<'p> {
    pub fn get(&self, name: &str) -> Option<&'p str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

/// A route table entry
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub name: &'static str,
    pub method: MethodMatch,
    pub template: PathTemplate,
    pub handler: H,
}

impl<H> Route<H> {
    pub fn new(name: &'static str, method: MethodMatch, template: &'static str, handler: H) -> Self {
        Self {
            name,
            method,
            template: PathTemplate::parse(template),
            handler,
        }
    }
}

/// Find the first route (in table order) accepting this method and path
pub fn match_route<'r, 'p, H>(
    method: &Method,
    path: &'p str,
    routes: &'r [Route<H>],
) -> Option<(&'r Route<H>, PathParams<'p>)> {
    routes.iter().find_map(|route| {
        if !route.method.matches(method) {
            return None;
        }
        route.template.matches(path).map(|params| (route, params))
    })
}
