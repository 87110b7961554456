use crate::errors::RouterError;
use crate::routing::RouteParams;
use std::fmt;
use std::sync::Arc;

/// Error raised by handler code. Dispatch passes it through untouched.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult<T> = Result<T, HandlerError>;

pub type HandlerFn<Q, T> = Arc<dyn Fn(&mut Q, &RouteParams) -> HandlerResult<T> + Send + Sync>;

/// An object whose actions can be targeted by `Type@action` handler references.
///
/// A fresh instance is built for every invocation, so implementors must not
/// rely on state surviving between requests.
pub trait Controller<Q, T> {
    /// Actions this controller answers to.
    fn actions(&self) -> &[&'static str];

    /// Runs `action`. Only called with a name listed by [`Controller::actions`].
    fn call(&mut self, action: &str, request: &mut Q, params: &RouteParams) -> HandlerResult<T>;
}

/// What to run for a matched route.
pub enum HandlerRef<Q, T> {
    /// A callback invoked directly.
    Inline(HandlerFn<Q, T>),
    /// A controller identifier and the action to run on it.
    Action { controller: String, action: String },
    /// A `"Type@action"` string, parsed when the handler is resolved.
    Named(String),
}

impl<Q, T> HandlerRef<Q, T> {
    pub fn inline<F>(f: F) -> Self
    where
        F: Fn(&mut Q, &RouteParams) -> HandlerResult<T> + Send + Sync + 'static,
    {
        HandlerRef::Inline(Arc::new(f))
    }

    pub fn action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        HandlerRef::Action {
            controller: controller.into(),
            action: action.into(),
        }
    }

    /// The `(controller, action)` pair this reference points at, if any.
    pub fn target(&self) -> Result<Option<(&str, &str)>, RouterError> {
        match self {
            HandlerRef::Inline(_) => Ok(None),
            HandlerRef::Action { controller, action } => {
                Ok(Some((controller.as_str(), action.as_str())))
            }
            HandlerRef::Named(spec) => parse_named_handler(spec).map(Some),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            HandlerRef::Inline(_) => "<inline>".to_string(),
            HandlerRef::Action { controller, action } => format!("{}@{}", controller, action),
            HandlerRef::Named(spec) => spec.clone(),
        }
    }
}

/// Splits `"Type@action"` into its two halves.
pub fn parse_named_handler(spec: &str) -> Result<(&str, &str), RouterError> {
    match spec.split_once('@') {
        Some((controller, action))
            if !controller.is_empty() && !action.is_empty() && !action.contains('@') =>
        {
            Ok((controller, action))
        }
        _ => Err(RouterError::InvalidHandler {
            handler: spec.to_string(),
            reason: "expected 'Type@action'".to_string(),
        }),
    }
}

impl<Q, T> Clone for HandlerRef<Q, T> {
    fn clone(&self) -> Self {
        match self {
            HandlerRef::Inline(f) => HandlerRef::Inline(Arc::clone(f)),
            HandlerRef::Action { controller, action } => HandlerRef::Action {
                controller: controller.clone(),
                action: action.clone(),
            },
            HandlerRef::Named(spec) => HandlerRef::Named(spec.clone()),
        }
    }
}

impl<Q, T> fmt::Debug for HandlerRef<Q, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Inline(_) => f.write_str("Inline(..)"),
            HandlerRef::Action { controller, action } => f
                .debug_struct("Action")
                .field("controller", controller)
                .field("action", action)
                .finish(),
            HandlerRef::Named(spec) => f.debug_tuple("Named").field(spec).finish(),
        }
    }
}

impl<Q, T> From<&str> for HandlerRef<Q, T> {
    fn from(spec: &str) -> Self {
        HandlerRef::Named(spec.to_string())
    }
}

impl<Q, T> From<String> for HandlerRef<Q, T> {
    fn from(spec: String) -> Self {
        HandlerRef::Named(spec)
    }
}

impl<Q, T> From<(&str, &str)> for HandlerRef<Q, T> {
    fn from((controller, action): (&str, &str)) -> Self {
        HandlerRef::action(controller, action)
    }
}
