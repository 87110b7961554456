use crate::handler::HandlerError;
use crate::routing::HttpMethod;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("ROUTE NOT FOUND: {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("METHOD NOT ALLOWED: {method} {path}")]
    MethodNotAllowed {
        method: String,
        path: String,
        /// Methods under which the path does have a route.
        allowed: Vec<HttpMethod>,
    },

    #[error("INVALID HANDLER: {handler} - {reason}")]
    InvalidHandler { handler: String, reason: String },

    #[error("UNKNOWN ROUTE NAME: {name}")]
    UnknownRouteName { name: String },

    #[error("INVALID ROUTE PATTERN: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("DUPLICATE PARAMETER: '{name}' appears more than once in {pattern}")]
    DuplicateParameter { pattern: String, name: String },

    #[error("MISSING PARAMETER: route '{name}' requires '{param}'")]
    MissingParameter { name: String, param: String },

    #[error("INVALID PARAMETER: value of '{param}' for route '{name}' contains '?' or '#'")]
    InvalidParameter { name: String, param: String },

    #[error("INVALID HTTP METHOD: {method}")]
    InvalidMethod { method: String },

    #[error("CONFIG ERROR: {message}")]
    Config { message: String },

    #[error(transparent)]
    Handler(HandlerError),
}

impl RouterError {
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::RouteNotFound { .. } => "ROUTER_ROUTE_NOT_FOUND",
            RouterError::MethodNotAllowed { .. } => "ROUTER_METHOD_NOT_ALLOWED",
            RouterError::InvalidHandler { .. } => "ROUTER_INVALID_HANDLER",
            RouterError::UnknownRouteName { .. } => "ROUTER_UNKNOWN_ROUTE_NAME",
            RouterError::InvalidPattern { .. } => "ROUTER_INVALID_PATTERN",
            RouterError::DuplicateParameter { .. } => "ROUTER_DUPLICATE_PARAMETER",
            RouterError::MissingParameter { .. } => "ROUTER_MISSING_PARAMETER",
            RouterError::InvalidParameter { .. } => "ROUTER_INVALID_PARAMETER",
            RouterError::InvalidMethod { .. } => "ROUTER_INVALID_METHOD",
            RouterError::Config { .. } => "ROUTER_CONFIG",
            RouterError::Handler(_) => "ROUTER_HANDLER_FAILED",
        }
    }

    /// HTTP status a caller should answer with when this error escapes dispatch.
    pub fn status_code(&self) -> u16 {
        match self {
            RouterError::RouteNotFound { .. } => 404,
            RouterError::MethodNotAllowed { .. } => 405,
            _ => 500,
        }
    }

    /// Value for an `Allow` header, present only for `MethodNotAllowed`.
    pub fn allow_header(&self) -> Option<String> {
        match self {
            RouterError::MethodNotAllowed { allowed, .. } => Some(
                allowed
                    .iter()
                    .map(HttpMethod::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}
