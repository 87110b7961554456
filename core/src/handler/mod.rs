pub mod registry;
pub mod types;

pub use registry::ControllerRegistry;
pub use types::{
    parse_named_handler, Controller, HandlerError, HandlerFn, HandlerRef, HandlerResult,
};
