//! Checks a requested metrics route against the routes bound to an app.
//!
//! A full `host/path` route must belong to the app so that registering a
//! metrics endpoint can never point the scraper at somebody else's host.

use crate::error::{RegistrarError, Result};
use crate::platform::{App, Route};
use url::Url;

/// How a requested route was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    /// A bare path, already relative to the app.
    Relative,
    /// A full route that prefix-matches one of the app's routes.
    Bound(&'a Route),
}

fn ensure_https_prefix(requested: &str) -> String {
    format!("https://{}", requested.replacen("https://", "", 1))
}

/// The `host[:port]` exactly as written, including a default `:443`.
fn authority(prefixed: &str) -> &str {
    let rest = prefixed.strip_prefix("https://").unwrap_or(prefixed);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    authority.rsplit_once('@').map_or(authority, |(_, host)| host)
}

/// Validates `requested` for `app`.
///
/// Bare paths are accepted as-is. Anything else is parsed as an `https` URL;
/// with `secure` set it must not carry a host, otherwise its host has to
/// equal a route's authority and its path has to start with that route's
/// path. The first matching route wins.
pub fn validate_route_for_app<'a>(requested: &str, app: &'a App, secure: bool) -> Result<RouteMatch<'a>> {
    if requested.starts_with('/') {
        return Ok(RouteMatch::Relative);
    }

    let prefixed = ensure_https_prefix(requested);
    let url = Url::parse(&prefixed)
        .map_err(|e| RegistrarError::validation(format!("unable to parse requested route: {e}")))?;
    let host = authority(&prefixed);

    if secure && !host.is_empty() {
        return Err(RegistrarError::validation(format!(
            "cannot provide hostname with --internal-port. provided: '{host}'"
        )));
    }

    app.routes
        .iter()
        .find(|route| {
            route.authority().eq_ignore_ascii_case(host)
                && url.path().starts_with(&route.normalized_path())
        })
        .map(RouteMatch::Bound)
        .ok_or_else(|| {
            RegistrarError::validation(format!(
                "route '{requested}' is not bound to app '{}'",
                app.name
            ))
        })
}
