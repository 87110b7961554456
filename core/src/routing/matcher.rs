use crate::errors::RouterError;
use crate::handler::ControllerRegistry;
use crate::request::Request;
use crate::routing::normalize::normalize_path;
use crate::routing::table::RouteTable;
use crate::routing::types::{HttpMethod, Route, RouteMatch};

/// A frozen route table plus the controllers its handlers refer to.
///
/// Read-only: safe to share across threads and dispatch from many at once.
pub struct Router<Q, T> {
    table: RouteTable<Q, T>,
    controllers: ControllerRegistry<Q, T>,
}

impl<Q, T> Router<Q, T> {
    pub fn new(table: RouteTable<Q, T>, controllers: ControllerRegistry<Q, T>) -> Self {
        Self { table, controllers }
    }

    pub fn table(&self) -> &RouteTable<Q, T> {
        &self.table
    }

    pub fn controllers(&self) -> &ControllerRegistry<Q, T> {
        &self.controllers
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route<Q, T>> {
        self.table.routes()
    }

    /// First route under `method` whose pattern matches `path`.
    pub fn resolve(&self, method: HttpMethod, path: &str) -> Result<RouteMatch<'_, Q, T>, RouterError> {
        self.match_route(method.as_str(), path)
    }

    /// Same as [`Router::resolve`] for a raw method string. A method outside
    /// the supported set has no routes of its own.
    pub fn match_route(&self, method: &str, path: &str) -> Result<RouteMatch<'_, Q, T>, RouterError> {
        let path = normalize_path(path);
        let requested = method.parse::<HttpMethod>().ok();

        if let Some(requested) = requested {
            for route in self.table.routes_for(requested) {
                if let Some(params) = route.pattern.captures(&path) {
                    log::debug!("Matched {} {} -> {}", requested, path, route.path);
                    return Ok(RouteMatch { route, params });
                }
            }
        }

        let allowed: Vec<HttpMethod> = self
            .allowed_methods(&path)
            .into_iter()
            .filter(|other| Some(*other) != requested)
            .collect();

        if allowed.is_empty() {
            log::debug!("No route for {} {}", method, path);
            Err(RouterError::RouteNotFound {
                method: method.to_string(),
                path,
            })
        } else {
            log::debug!("{} {} only allows {:?}", method, path, allowed);
            Err(RouterError::MethodNotAllowed {
                method: method.to_string(),
                path,
                allowed,
            })
        }
    }

    /// Methods with at least one route matching `path`.
    pub fn allowed_methods(&self, path: &str) -> Vec<HttpMethod> {
        let path = normalize_path(path);
        HttpMethod::ALL
            .into_iter()
            .filter(|method| {
                self.table
                    .routes_for(*method)
                    .iter()
                    .any(|route| route.pattern.is_match(&path))
            })
            .collect()
    }

    /// Matches the request, attaches the captured parameters to it and
    /// runs the route's handler. Handler errors come back unchanged inside
    /// [`RouterError::Handler`].
    pub fn dispatch(&self, request: &mut Q) -> Result<T, RouterError>
    where
        Q: Request,
    {
        let method = request.method().to_string();
        let path = request.path().to_string();
        let matched = self.match_route(&method, &path)?;

        for (name, value) in matched.params.iter() {
            request.set_route_param(name, value);
        }

        self.controllers
            .invoke(&matched.route.handler, request, &matched.params)
    }

    pub fn url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
        self.table.resolve_url(name, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Controller, HandlerRef, HandlerResult};
    use crate::request::HttpRequest;
    use crate::routing::RouteParams;

    fn reply(body: &'static str) -> HandlerRef<HttpRequest, String> {
        HandlerRef::inline(move |_, params: &RouteParams| {
            if params.is_empty() {
                Ok(body.to_string())
            } else {
                Ok(format!("{}:{}", body, params.values().join(",")))
            }
        })
    }

    fn blog_router() -> Router<HttpRequest, String> {
        let mut table = RouteTable::new();
        table.get("/", reply("H1")).unwrap();
        table.get("/posts/{id}", reply("H2")).unwrap().name("posts.show");
        table.post("/posts", reply("H3")).unwrap();
        table.into_router(ControllerRegistry::new())
    }

    #[test]
    fn test_scenario_dispatch() {
        let router = blog_router();

        let mut request = HttpRequest::new("GET", "/posts/42");
        assert_eq!(router.dispatch(&mut request).unwrap(), "H2:42");
        assert_eq!(request.route_param("id"), Some("42"));

        let mut request = HttpRequest::new("DELETE", "/posts/42");
        match router.dispatch(&mut request) {
            Err(RouterError::MethodNotAllowed { allowed, .. }) => {
                assert_eq!(allowed, vec![HttpMethod::GET])
            }
            other => panic!("Expected MethodNotAllowed, got {:?}", other),
        }

        let mut request = HttpRequest::new("GET", "/posts");
        match router.dispatch(&mut request) {
            Err(RouterError::MethodNotAllowed { allowed, .. }) => {
                // POST /posts exists, so the path is known under another verb.
                assert_eq!(allowed, vec![HttpMethod::POST])
            }
            other => panic!("Expected MethodNotAllowed, got {:?}", other),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = RouteTable::new();
        table.get("/posts/new", reply("create-form")).unwrap();
        table.get("/posts/{id}", reply("show")).unwrap();
        let router = table.into_router(ControllerRegistry::new());

        let matched = router.resolve(HttpMethod::GET, "/posts/new").unwrap();
        assert_eq!(matched.route.path, "/posts/new");
        assert!(matched.params.is_empty());

        let matched = router.resolve(HttpMethod::GET, "/posts/17").unwrap();
        assert_eq!(matched.route.path, "/posts/{id}");
        assert_eq!(matched.params.get("id"), Some("17"));
    }

    #[test]
    fn test_request_path_is_normalized() {
        let router = blog_router();
        for path in ["//posts//42/", "/posts/42?draft=1", "posts/42#top"] {
            let matched = router.resolve(HttpMethod::GET, path).unwrap();
            assert_eq!(matched.route.path, "/posts/{id}");
            assert_eq!(matched.params.get("id"), Some("42"));
        }
    }

    #[test]
    fn test_unsupported_method_string() {
        let router = blog_router();
        assert!(matches!(
            router.match_route("HEAD", "/posts/1"),
            Err(RouterError::MethodNotAllowed { .. })
        ));
        assert!(matches!(
            router.match_route("HEAD", "/nowhere"),
            Err(RouterError::RouteNotFound { .. })
        ));
        assert!(router.match_route("get", "/").is_ok());
    }

    #[test]
    fn test_allowed_methods() {
        let mut table = RouteTable::new();
        table.get("/widgets/{id}", reply("show")).unwrap();
        table.put("/widgets/{id}", reply("update")).unwrap();
        table.delete("/widgets/{id}", reply("destroy")).unwrap();
        let router = table.into_router(ControllerRegistry::new());

        assert_eq!(
            router.allowed_methods("/widgets/3"),
            vec![HttpMethod::GET, HttpMethod::PUT, HttpMethod::DELETE]
        );
        assert!(router.allowed_methods("/gadgets/3").is_empty());
    }

    struct EchoController;

    impl Controller<HttpRequest, String> for EchoController {
        fn actions(&self) -> &[&'static str] {
            &["show"]
        }

        fn call(&mut self, _action: &str, request: &mut HttpRequest, params: &RouteParams) -> HandlerResult<String> {
            Ok(format!(
                "{} {} id={}",
                request.method(),
                request.path(),
                params.get("id").unwrap_or_default()
            ))
        }
    }

    #[test]
    fn test_freeze_validates_controller_handlers() {
        let mut table: RouteTable<HttpRequest, String> = RouteTable::new();
        table.get("/echo/{id}", "EchoController@show").unwrap();
        table.get("/ghost", "GhostController@show").unwrap();

        let mut controllers = ControllerRegistry::new();
        controllers.register("EchoController", || EchoController);

        match table.freeze(controllers) {
            Err(RouterError::InvalidHandler { handler, .. }) => {
                assert_eq!(handler, "GhostController@show")
            }
            Err(other) => panic!("Expected InvalidHandler, got {:?}", other),
            Ok(_) => panic!("Expected InvalidHandler"),
        }
    }

    #[test]
    fn test_dispatch_to_controller() {
        let mut table: RouteTable<HttpRequest, String> = RouteTable::new();
        table.get("/echo/{id}", "EchoController@show").unwrap();
        table.get("/broken", ("EchoController", "missing")).unwrap();

        let mut controllers = ControllerRegistry::new();
        controllers.register("EchoController", || EchoController);
        let router = table.into_router(controllers);

        let mut request = HttpRequest::new("get", "/echo/5?x=1");
        assert_eq!(router.dispatch(&mut request).unwrap(), "GET /echo/5 id=5");

        let mut request = HttpRequest::new("GET", "/broken");
        assert!(matches!(
            router.dispatch(&mut request),
            Err(RouterError::InvalidHandler { .. })
        ));
    }

    #[test]
    fn test_url_generation() {
        let router = blog_router();
        assert_eq!(router.url("posts.show", &[("id", "42")]).unwrap(), "/posts/42");
        assert!(matches!(
            router.url("nope", &[]),
            Err(RouterError::UnknownRouteName { .. })
        ));
    }
}
