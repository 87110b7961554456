pub use crate::config::{RouteDefinitions, RouteManifest};
pub use crate::errors::RouterError;
pub use crate::handler::{Controller, ControllerRegistry, HandlerRef, HandlerResult};
pub use crate::request::{HttpRequest, Request};
pub use crate::routing::{
    compile_pattern, normalize_path, HttpMethod, Route, RouteMatch, RouteParams, RouteTable, Router,
};
