//! JSON route manifests.
//!
//! ```json
//! {
//!   "routes": [
//!     { "method": "GET", "path": "/", "handler": "HomeController@index", "name": "home" }
//!   ],
//!   "groups": [
//!     {
//!       "prefix": "/api",
//!       "routes": [
//!         { "method": "POST", "path": "/login", "handler": ["LoginController", "login"] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A group's callback cannot be serialized, so manifest groups carry their
//! own `routes` and nested `groups` instead.

use crate::errors::RouterError;
use crate::handler::HandlerRef;
use crate::routing::{HttpMethod, RouteTable};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
    #[serde(default)]
    pub groups: Vec<ManifestGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestRoute {
    pub method: String,
    pub path: String,
    pub handler: HandlerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestGroup {
    pub prefix: String,
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
    #[serde(default)]
    pub groups: Vec<ManifestGroup>,
}

/// `"Type@action"` or `["Type", "action"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandlerSpec {
    Named(String),
    Pair(String, String),
}

impl<Q, T> From<&HandlerSpec> for HandlerRef<Q, T> {
    fn from(spec: &HandlerSpec) -> Self {
        match spec {
            HandlerSpec::Named(name) => HandlerRef::Named(name.clone()),
            HandlerSpec::Pair(controller, action) => HandlerRef::action(controller, action),
        }
    }
}

impl RouteManifest {
    pub fn from_json_str(json: &str) -> Result<Self, RouterError> {
        serde_json::from_str(json).map_err(|e| RouterError::Config {
            message: format!("invalid route manifest: {}", e),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RouterError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| RouterError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        log::debug!("Read route manifest from {}", path.display());
        Self::from_json_str(&json)
    }
}

impl<Q, T> RouteTable<Q, T> {
    /// Registers a manifest's routes in listed order, then its groups.
    pub fn load_manifest(&mut self, manifest: &RouteManifest) -> Result<(), RouterError> {
        self.load_manifest_entries(&manifest.routes, &manifest.groups)
    }

    fn load_manifest_entries(
        &mut self,
        routes: &[ManifestRoute],
        groups: &[ManifestGroup],
    ) -> Result<(), RouterError> {
        for route in routes {
            let method: HttpMethod = route.method.parse()?;
            self.add_route(method, &route.path, &route.handler, route.name.as_deref())?;
        }
        for group in groups {
            self.group(&group.prefix, |table| {
                table.load_manifest_entries(&group.routes, &group.groups)
            })?;
        }
        Ok(())
    }
}
