//! Unbinding registrations from an app and cleaning up after them.

use crate::error::Result;
use crate::platform::Platform;
use crate::ports::{port_from_config, ports_to_release, release_ports_for_app};
use crate::registrations::{Registration, RegistrationFetcher, RegistrationKind};
use tracing::{debug, info};

/// Which metrics endpoints to unregister. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsEndpointFilter {
    pub path: String,
    pub internal_port: Option<u16>,
}

impl MetricsEndpointFilter {
    fn matches(&self, registration: &Registration) -> bool {
        match (self.internal_port, self.path.as_str()) {
            (None, "") => true,
            (None, path) => registration.config == path,
            (Some(port), "") => port_from_config(&registration.config) == Some(port),
            (Some(port), path) => registration.config == format!(":{port}{path}"),
        }
    }
}

/// Unbinds the app's log format registrations; an empty `format` removes all of them.
pub fn unregister_log_format<P, F>(platform: &P, fetcher: &F, app_name: &str, format: &str) -> Result<()>
where
    P: Platform + ?Sized,
    F: RegistrationFetcher + ?Sized,
{
    let app = platform.get_app(app_name)?;
    let registrations = fetcher.fetch(&app.guid, &[RegistrationKind::StructuredFormat])?;

    for registration in registrations
        .iter()
        .filter(|r| format.is_empty() || r.config == format)
    {
        remove_registration(platform, app_name, registration)?;
    }
    Ok(())
}

/// Unbinds the app's metrics and secure endpoints matching `filter`, then
/// stops exposing ports no remaining registration uses.
pub fn unregister_metrics_endpoint<P, F>(
    platform: &P,
    fetcher: &F,
    app_name: &str,
    filter: &MetricsEndpointFilter,
) -> Result<()>
where
    P: Platform + ?Sized,
    F: RegistrationFetcher + ?Sized,
{
    let app = platform.get_app(app_name)?;
    let registrations = fetcher.fetch(&app.guid, &RegistrationKind::METRICS)?;
    let (removed, remaining): (Vec<&Registration>, Vec<&Registration>) =
        registrations.iter().partition(|r| filter.matches(r));

    for registration in &removed {
        remove_registration(platform, app_name, registration)?;
    }

    let release = ports_to_release(
        removed.iter().map(|r| r.config.as_str()),
        remaining.iter().map(|r| r.config.as_str()),
    );
    debug!(app = %app_name, ?release, "releasing ports");
    release_ports_for_app(platform, &app.guid, &release)
}

/// Unbinds one registration and deletes the service when this app held its last binding.
///
/// A failed delete after a successful unbind leaves an unbound service behind.
fn remove_registration<P: Platform + ?Sized>(
    platform: &P,
    app_name: &str,
    registration: &Registration,
) -> Result<()> {
    platform.unbind_service(app_name, &registration.name)?;
    info!(app = %app_name, service = %registration.name, "unbound service");

    if registration.number_of_bindings == 1 {
        platform.delete_service(&registration.name)?;
        info!(service = %registration.name, "deleted service");
    }
    Ok(())
}
