use crate::errors::RouterError;
use crate::handler::HandlerRef;
use crate::routing::{HttpMethod, RouteTable};

pub type GroupCallback<Q, T> = Box<dyn FnOnce(&mut RouteTable<Q, T>) -> Result<(), RouterError>>;

pub struct RouteDefinition<Q, T> {
    pub method: HttpMethod,
    pub path: String,
    pub handler: HandlerRef<Q, T>,
    pub name: Option<String>,
}

pub struct GroupDefinition<Q, T> {
    pub prefix: String,
    pub callback: GroupCallback<Q, T>,
}

/// Routes and groups declared up front and applied in one call to
/// [`RouteTable::load`].
pub struct RouteDefinitions<Q, T> {
    pub routes: Vec<RouteDefinition<Q, T>>,
    pub groups: Vec<GroupDefinition<Q, T>>,
}

impl<Q, T> RouteDefinitions<Q, T> {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn route(
        mut self,
        method: HttpMethod,
        path: impl Into<String>,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Self {
        self.routes.push(RouteDefinition {
            method,
            path: path.into(),
            handler: handler.into(),
            name: None,
        });
        self
    }

    pub fn named_route(
        mut self,
        name: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
        handler: impl Into<HandlerRef<Q, T>>,
    ) -> Self {
        self.routes.push(RouteDefinition {
            method,
            path: path.into(),
            handler: handler.into(),
            name: Some(name.into()),
        });
        self
    }

    pub fn group<F>(mut self, prefix: impl Into<String>, callback: F) -> Self
    where
        F: FnOnce(&mut RouteTable<Q, T>) -> Result<(), RouterError> + 'static,
    {
        self.groups.push(GroupDefinition {
            prefix: prefix.into(),
            callback: Box::new(callback),
        });
        self
    }
}

impl<Q, T> Default for RouteDefinitions<Q, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, T> RouteTable<Q, T> {
    /// Registers every listed route in order, then runs every group.
    pub fn load(&mut self, definitions: RouteDefinitions<Q, T>) -> Result<(), RouterError> {
        log::debug!(
            "Loading {} route definitions and {} groups",
            definitions.routes.len(),
            definitions.groups.len()
        );

        for route in definitions.routes {
            self.add_route(route.method, &route.path, route.handler, route.name.as_deref())?;
        }
        for group in definitions.groups {
            self.group(&group.prefix, group.callback)?;
        }
        Ok(())
    }
}
