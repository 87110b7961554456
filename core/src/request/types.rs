use crate::request::parser::{parse_query_string, split_uri};
use std::collections::HashMap;

/// What the router needs from an incoming request.
pub trait Request {
    fn method(&self) -> &str;

    /// Request path. Treated as an opaque string; no percent-decoding is done.
    fn path(&self) -> &str;

    /// Attaches a captured path parameter so handlers can read it back.
    fn set_route_param(&mut self, name: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub route_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Builds a request from a method and a request URI such as `/posts?page=2`.
    pub fn new(method: &str, uri: &str) -> Self {
        let (path, query) = split_uri(uri);
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            headers: HashMap::new(),
            query_params: query.map(parse_query_string).unwrap_or_default(),
            route_params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn route_param(&self, name: &str) -> Option<&str> {
        self.route_params.get(name).map(String::as_str)
    }

    /// Route parameter first, then query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_param(name).or_else(|| self.query(name))
    }

    pub fn expects_json(&self) -> bool {
        self.header("accept")
            .is_some_and(|accept| accept.contains("application/json"))
    }
}

impl Request for HttpRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn set_route_param(&mut self, name: &str, value: &str) {
        self.route_params.insert(name.to_string(), value.to_string());
    }
}
