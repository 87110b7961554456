pub mod definitions;
pub mod manifest;

pub use definitions::{GroupCallback, GroupDefinition, RouteDefinition, RouteDefinitions};
pub use manifest::{HandlerSpec, ManifestGroup, ManifestRoute, RouteManifest};
