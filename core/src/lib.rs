//! # TAIPA ROUTER
//!
//! **REQUEST-ROUTING ENGINE FOR THE TAIPA WEB STACK**
//!
//! **LIFECYCLE**: build a [`RouteTable`](routing::RouteTable) once, freeze it
//! into a [`Router`](routing::Router), dispatch many times
//! **MATCHING**: first registered route wins, per HTTP method
//! **FAILURES**: `RouteNotFound` (404) and `MethodNotAllowed` (405)
//!
//! ```rust
//! use taipa_router::api::*;
//!
//! let mut table: RouteTable<HttpRequest, String> = RouteTable::new();
//! table.get("/posts/{id}", HandlerRef::inline(|_req, params| {
//!     Ok(format!("post {}", params.get("id").unwrap_or_default()))
//! }))?;
//! let router = table.freeze(ControllerRegistry::new())?;
//!
//! let mut request = HttpRequest::new("GET", "/posts/42");
//! assert_eq!(router.dispatch(&mut request)?, "post 42");
//! # Ok::<(), RouterError>(())
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod handler;
pub mod request;
pub mod routing;
