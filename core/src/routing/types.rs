use crate::errors::RouterError;
use crate::handler::HandlerRef;
use crate::routing::parser::PathPattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    OPTIONS,
}

impl HttpMethod {
    /// Every supported method, in the order used for `Allow` headers.
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::OPTIONS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RouterError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "PATCH" => Ok(HttpMethod::PATCH),
            "DELETE" => Ok(HttpMethod::DELETE),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            _ => Err(RouterError::InvalidMethod {
                method: method.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = RouterError;

    fn try_from(method: String) -> Result<Self, Self::Error> {
        method.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// A registered route. Immutable once it is in a table.
pub struct Route<Q, T> {
    pub method: HttpMethod,
    /// Normalized path template, e.g. `/posts/{id}`.
    pub path: String,
    pub pattern: PathPattern,
    pub handler: HandlerRef<Q, T>,
    pub name: Option<String>,
}

impl<Q, T> Route<Q, T> {
    pub fn param_names(&self) -> &[String] {
        self.pattern.param_names()
    }
}

impl<Q, T> fmt::Debug for Route<Q, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("param_names", &self.pattern.param_names())
            .field("handler", &self.handler)
            .field("name", &self.name)
            .finish()
    }
}

/// Path parameters captured by a match, in the order the template declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    entries: Vec<(String, String)>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value at `index` in declaration order.
    pub fn at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, value)| value.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Result of a successful lookup. Lives for a single dispatch.
#[derive(Debug)]
pub struct RouteMatch<'r, Q, T> {
    pub route: &'r Route<Q, T>,
    pub params: RouteParams,
}
