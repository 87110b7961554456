use crate::errors::RouterError;
use crate::handler::types::{parse_named_handler, Controller, HandlerRef};
use crate::routing::RouteParams;
use std::collections::HashMap;

type ControllerFactory<Q, T> = Box<dyn Fn() -> Box<dyn Controller<Q, T>> + Send + Sync>;

/// Maps controller identifiers to zero-argument factories.
pub struct ControllerRegistry<Q, T> {
    factories: HashMap<String, ControllerFactory<Q, T>>,
}

impl<Q, T> ControllerRegistry<Q, T> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register<C, F>(&mut self, name: impl Into<String>, factory: F)
    where
        Q: 'static,
        T: 'static,
        C: Controller<Q, T> + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registering controller {}", name);
        self.factories.insert(
            name,
            Box::new(move || Box::new(factory()) as Box<dyn Controller<Q, T>>),
        );
    }

    /// Registers a controller built with `Default::default()`.
    pub fn register_default<C>(&mut self, name: impl Into<String>)
    where
        Q: 'static,
        T: 'static,
        C: Controller<Q, T> + Default + 'static,
    {
        self.register(name, C::default);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Builds a fresh controller instance. Instances are never cached.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Controller<Q, T>>, RouterError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RouterError::InvalidHandler {
                handler: name.to_string(),
                reason: "controller not registered".to_string(),
            })?;
        Ok(factory())
    }

    /// Checks that `handler` would resolve, without invoking it.
    pub fn validate(&self, handler: &HandlerRef<Q, T>) -> Result<(), RouterError> {
        match handler.target()? {
            None => Ok(()),
            Some((controller, action)) => self.instantiate_for(controller, action).map(|_| ()),
        }
    }

    /// Resolves `handler` and runs it with the request and captured parameters.
    pub fn invoke(
        &self,
        handler: &HandlerRef<Q, T>,
        request: &mut Q,
        params: &RouteParams,
    ) -> Result<T, RouterError> {
        match handler {
            HandlerRef::Inline(f) => f(request, params).map_err(RouterError::Handler),
            HandlerRef::Action { controller, action } => {
                self.call_action(controller, action, request, params)
            }
            HandlerRef::Named(spec) => {
                let (controller, action) = parse_named_handler(spec)?;
                self.call_action(controller, action, request, params)
            }
        }
    }

    fn call_action(
        &self,
        controller: &str,
        action: &str,
        request: &mut Q,
        params: &RouteParams,
    ) -> Result<T, RouterError> {
        let mut instance = self.instantiate_for(controller, action)?;
        instance
            .call(action, request, params)
            .map_err(RouterError::Handler)
    }

    fn instantiate_for(
        &self,
        controller: &str,
        action: &str,
    ) -> Result<Box<dyn Controller<Q, T>>, RouterError> {
        let handler = format!("{}@{}", controller, action);
        let instance = self.instantiate(controller).map_err(|_| {
            log::warn!("Handler {} refers to an unregistered controller", handler);
            RouterError::InvalidHandler {
                handler: handler.clone(),
                reason: format!("controller '{}' not registered", controller),
            }
        })?;

        if !instance.actions().iter().any(|name| *name == action) {
            log::warn!("Handler {} refers to a missing action", handler);
            return Err(RouterError::InvalidHandler {
                handler,
                reason: format!("controller '{}' has no action '{}'", controller, action),
            });
        }
        Ok(instance)
    }
}

impl<Q, T> Default for ControllerRegistry<Q, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct PostController {
        calls: usize,
    }

    impl Controller<Vec<String>, String> for PostController {
        fn actions(&self) -> &[&'static str] {
            &["show", "fail"]
        }

        fn call(
            &mut self,
            action: &str,
            request: &mut Vec<String>,
            params: &RouteParams,
        ) -> HandlerResult<String> {
            self.calls += 1;
            request.push(action.to_string());
            match action {
                "show" => Ok(format!("post {} (call {})", params.get("id").unwrap_or("?"), self.calls)),
                _ => Err("post store unavailable".into()),
            }
        }
    }

    fn registry() -> ControllerRegistry<Vec<String>, String> {
        let mut registry = ControllerRegistry::new();
        registry.register_default::<PostController>("PostController");
        registry
    }

    fn id_params(id: &str) -> RouteParams {
        vec![("id", id)].into_iter().collect()
    }

    #[test]
    fn test_invoke_named_and_pair() {
        let registry = registry();
        let mut request = Vec::new();

        let named: HandlerRef<_, _> = "PostController@show".into();
        let result = registry.invoke(&named, &mut request, &id_params("42")).unwrap();
        assert_eq!(result, "post 42 (call 1)");

        let pair: HandlerRef<_, _> = ("PostController", "show").into();
        let result = registry.invoke(&pair, &mut request, &id_params("7")).unwrap();
        // A fresh instance per invocation, so the counter restarts.
        assert_eq!(result, "post 7 (call 1)");
        assert_eq!(request, vec!["show", "show"]);
    }

    #[test]
    fn test_invoke_inline() {
        let registry = registry();
        let handler = HandlerRef::inline(|request: &mut Vec<String>, params: &RouteParams| {
            request.push("inline".to_string());
            Ok(params.values().join(","))
        });
        let params: RouteParams = vec![("a", "1"), ("b", "2")].into_iter().collect();
        let mut request = Vec::new();
        assert_eq!(registry.invoke(&handler, &mut request, &params).unwrap(), "1,2");
        assert_eq!(request, vec!["inline"]);
    }

    #[test]
    fn test_unknown_controller_and_action() {
        let registry = registry();
        let mut request = Vec::new();

        let missing: HandlerRef<_, _> = "GhostController@show".into();
        assert!(matches!(
            registry.invoke(&missing, &mut request, &RouteParams::new()),
            Err(RouterError::InvalidHandler { .. })
        ));

        let no_action: HandlerRef<_, _> = ("PostController", "destroy").into();
        match registry.validate(&no_action) {
            Err(RouterError::InvalidHandler { handler, reason }) => {
                assert_eq!(handler, "PostController@destroy");
                assert!(reason.contains("destroy"));
            }
            other => panic!("Expected InvalidHandler, got {:?}", other.err()),
        }
        assert!(request.is_empty());
    }

    #[test]
    fn test_handler_error_passes_through() {
        let registry = registry();
        let handler: HandlerRef<_, _> = "PostController@fail".into();
        match registry.invoke(&handler, &mut Vec::new(), &RouteParams::new()) {
            Err(RouterError::Handler(err)) => assert_eq!(err.to_string(), "post store unavailable"),
            other => panic!("Expected handler error, got {:?}", other),
        }
    }

    #[test]
    fn test_factory_runs_per_resolution() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);

        let mut registry: ControllerRegistry<Vec<String>, String> = ControllerRegistry::new();
        registry.register("PostController", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            PostController::default()
        });

        let handler: HandlerRef<_, _> = "PostController@show".into();
        for _ in 0..3 {
            registry
                .invoke(&handler, &mut Vec::new(), &id_params("1"))
                .unwrap();
        }
        assert_eq!(built.load(Ordering::SeqCst), 3);
        assert!(registry.contains("PostController"));
        assert_eq!(registry.len(), 1);
    }
}
