//! Lists the routes of a JSON manifest and optionally resolves one request.
//!
//! ```text
//! routes <manifest.json> [METHOD PATH]
//! ```

use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;
use taipa_router::config::RouteManifest;
use taipa_router::handler::ControllerRegistry;
use taipa_router::request::HttpRequest;
use taipa_router::routing::{HttpMethod, RouteTable, Router};

#[derive(Serialize)]
struct RouteSummary<'a> {
    method: HttpMethod,
    path: &'a str,
    handler: String,
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Resolution<'a> {
    method: &'a str,
    path: &'a str,
    route: Option<RouteSummary<'a>>,
    params: Vec<(&'a str, &'a str)>,
    error: Option<String>,
    status: u16,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (manifest_path, request) = match args.as_slice() {
        [manifest] => (manifest, None),
        [manifest, method, path] => (manifest, Some((method.as_str(), path.as_str()))),
        _ => {
            eprintln!("usage: routes <manifest.json> [METHOD PATH]");
            return Ok(ExitCode::from(2));
        }
    };

    let manifest = RouteManifest::from_path(manifest_path)?;
    let mut table: RouteTable<HttpRequest, String> = RouteTable::new();
    table.load_manifest(&manifest)?;
    let router = table.into_router(ControllerRegistry::new());

    match request {
        None => {
            let summaries: Vec<RouteSummary> = router.routes().map(summarize).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            Ok(ExitCode::SUCCESS)
        }
        Some((method, path)) => resolve(&router, method, path),
    }
}

fn resolve(
    router: &Router<HttpRequest, String>,
    method: &str,
    path: &str,
) -> Result<ExitCode, Box<dyn Error>> {
    let outcome = router.match_route(method, path);
    let resolution = match &outcome {
        Ok(matched) => Resolution {
            method,
            path,
            route: Some(summarize(matched.route)),
            params: matched.params.iter().collect(),
            error: None,
            status: 200,
        },
        Err(err) => Resolution {
            method,
            path,
            route: None,
            params: Vec::new(),
            error: Some(err.to_string()),
            status: err.status_code(),
        },
    };

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn summarize(route: &taipa_router::routing::Route<HttpRequest, String>) -> RouteSummary<'_> {
    RouteSummary {
        method: route.method,
        path: &route.path,
        handler: route.handler.describe(),
        name: route.name.as_deref(),
    }
}
