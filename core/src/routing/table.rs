use crate::errors::RouterError;
use crate::handler::{ControllerRegistry, HandlerRef};
use crate::routing::matcher::Router;
use crate::routing::normalize::normalize_template;
use crate::routing::parser::{compile_pattern, owns_leading_slash, tokenize, Segment};
use crate::routing::types::{HttpMethod, Route};
use std::collections::HashMap;

/// Target of a named route, used for reverse routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRoute {
    pub method: HttpMethod,
    pub path: String,
}

/// Routes partitioned by method, in registration order.
///
/// The table is append-only. It is built once, then frozen into a
/// [`Router`] for dispatch.
pub struct RouteTable<Q, T> {
    pub(crate) routes: HashMap<HttpMethod, Vec<Route<Q, T>>>,
    names: HashMap<String, NamedRoute>,
    prefixes: Vec<String>,
}

/// Handle to a just-registered route, used to give it a name.
pub struct Registered<'t, Q, T> {
    table: &'t mut RouteTable<Q, T>,
    method: HttpMethod,
    index: usize,
}

impl<Q, T> Registered<'_, Q, T> {
    pub fn name(self, name: impl Into<String>) {
        let name = name.into();
        let route = &mut self.table.routes.entry(self.method).or_default()[self.index];
        route.name = Some(name.clone());
        let path = route.path.clone();
        self.table.register_name(name, self.method, path);
    }
}

impl<Q, T> RouteTable<Q, T> {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            names: HashMap::new(),
            prefixes: Vec::new(),
        }
    }

    /// Registers `path` (prefixed by every enclosing group) under `method`.
    pub fn add_route(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
        name: Option<&str>,
    ) -> Result<(), RouterError> {
        let registered = self.route(method, path, handler)?;
        if let Some(name) = name {
            registered.name(name);
        }
        Ok(())
    }

    pub fn route(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        let full_path = format!("{}{}", self.prefixes.concat(), path);
        let normalized = normalize_template(&full_path);
        let pattern = compile_pattern(&normalized)?;
        let handler = handler.into();

        log::debug!(
            "Registering route {} {} -> {}",
            method,
            normalized,
            handler.describe()
        );

        let routes = self.routes.entry(method).or_default();
        routes.push(Route {
            method,
            path: normalized,
            pattern,
            handler,
            name: None,
        });
        let index = routes.len() - 1;

        Ok(Registered {
            table: self,
            method,
            index,
        })
    }

    pub fn get(
        &mut self,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        self.route(HttpMethod::GET, path, handler)
    }

    pub fn post(
        &mut self,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        self.route(HttpMethod::POST, path, handler)
    }

    pub fn put(
        &mut self,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        self.route(HttpMethod::PUT, path, handler)
    }

    pub fn patch(
        &mut self,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        self.route(HttpMethod::PATCH, path, handler)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        self.route(HttpMethod::DELETE, path, handler)
    }

    pub fn options(
        &mut self,
        path: &str,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Result<Registered<'_, Q, T>, RouterError> {
        self.route(HttpMethod::OPTIONS, path, handler)
    }

    /// Runs `builder` with `prefix` prepended to every route it registers.
    ///
    /// Groups nest; prefixes concatenate in nesting order. The prefix is
    /// popped even when `builder` fails.
    pub fn group<F>(&mut self, prefix: &str, builder: F) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Self) -> Result<(), RouterError>,
    {
        self.prefixes.push(prefix.to_string());
        log::debug!("Entering route group {}", self.prefixes.concat());

        let result = builder(self);

        log::debug!("Leaving route group {}", self.prefixes.concat());
        self.prefixes.pop();
        result
    }

    fn register_name(&mut self, name: String, method: HttpMethod, path: String) {
        let target = NamedRoute { method, path };
        if let Some(previous) = self.names.insert(name.clone(), target) {
            log::warn!(
                "Route name '{}' reassigned (was {} {})",
                name,
                previous.method,
                previous.path
            );
        }
    }

    pub fn named(&self, name: &str) -> Option<&NamedRoute> {
        self.names.get(name)
    }

    /// Builds the URL of a named route.
    ///
    /// Placeholders are filled by key. An optional placeholder filling a
    /// whole segment is dropped together with the slash before it when it
    /// has no value. Parameters that fill no placeholder are appended as a
    /// query string. Placeholder values are inserted verbatim and must not
    /// contain `?` or `#`, which would end the path early.
    pub fn resolve_url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
        let target = self
            .names
            .get(name)
            .ok_or_else(|| RouterError::UnknownRouteName {
                name: name.to_string(),
            })?;

        let segments = tokenize(&target.path)?;
        let mut url = String::with_capacity(target.path.len());
        let mut used = vec![false; params.len()];

        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Param { name: param, optional } => {
                    let value = params
                        .iter()
                        .position(|(key, _)| *key == param.as_str())
                        .map(|i| {
                            used[i] = true;
                            params[i].1
                        });
                    match value {
                        Some(value) if value.contains(['?', '#']) => {
                            return Err(RouterError::InvalidParameter {
                                name: name.to_string(),
                                param: param.clone(),
                            })
                        }
                        Some(value) if !(*optional && value.is_empty()) => url.push_str(value),
                        _ if *optional => {
                            if owns_leading_slash(&segments, index) && url.ends_with('/') {
                                url.pop();
                            }
                        }
                        _ => {
                            return Err(RouterError::MissingParameter {
                                name: name.to_string(),
                                param: param.clone(),
                            })
                        }
                    }
                }
            }
        }

        if url.is_empty() {
            url.push('/');
        }

        let query: Vec<String> = params
            .iter()
            .zip(used)
            .filter(|(_, used)| !used)
            .map(|((key, value), _)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        Ok(url)
    }

    pub fn routes_for(&self, method: HttpMethod) -> &[Route<Q, T>] {
        self.routes
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All routes, grouped by method in [`HttpMethod::ALL`] order.
    pub fn routes(&self) -> impl Iterator<Item = &Route<Q, T>> {
        HttpMethod::ALL
            .into_iter()
            .flat_map(move |method| self.routes_for(method).iter())
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ends registration after checking that every controller reference
    /// resolves against `controllers`.
    pub fn freeze(self, controllers: ControllerRegistry<Q, T>) -> Result<Router<Q, T>, RouterError> {
        for route in self.routes() {
            controllers.validate(&route.handler)?;
        }
        Ok(self.into_router(controllers))
    }

    /// Ends registration without validating handlers; resolution errors
    /// surface at dispatch instead.
    pub fn into_router(self, controllers: ControllerRegistry<Q, T>) -> Router<Q, T> {
        log::debug!("Route table frozen with {} routes", self.len());
        Router::new(self, controllers)
    }
}

impl<Q, T> Default for RouteTable<Q, T> {
    fn default() -> Self {
        Self::new()
    }
}
