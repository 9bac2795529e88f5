//! Registering log formats and metrics endpoints.

use crate::error::{RegistrarError, Result};
use crate::naming::generate_service_name;
use crate::platform::Platform;
use crate::ports::expose_port_for_app;
use crate::registrations::RegistrationKind;
use crate::routes::validate_route_for_app;
use tracing::{debug, info};

/// How a metrics endpoint is scraped. Exactly one of the two must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsEndpointOptions {
    /// Scrape on this container port instead of the public route.
    pub internal_port: Option<u16>,
    /// Scrape over the app's public route.
    pub insecure: bool,
}

/// Binds `app_name` to the `structured-format` service for `log_format`.
pub fn register_log_format<P: Platform + ?Sized>(platform: &P, app_name: &str, log_format: &str) -> Result<()> {
    ensure_service_and_bind(platform, app_name, RegistrationKind::StructuredFormat, log_format)
}

/// Registers a metrics endpoint for `app_name`.
///
/// Secure endpoints (`internal_port` set) take a bare path, are stored as
/// `:<port><path>` and make sure the port is exposed on the app. Insecure
/// endpoints take a bare path or a route bound to the app.
pub fn register_metrics_endpoint<P: Platform + ?Sized>(
    platform: &P,
    app_name: &str,
    route: &str,
    options: MetricsEndpointOptions,
) -> Result<()> {
    let internal_port = match (options.internal_port, options.insecure) {
        (Some(port), false) => Some(port),
        (None, true) => None,
        _ => {
            return Err(RegistrarError::usage(
                "exactly one of --internal-port or --insecure is required",
            ));
        }
    };

    let app = platform.get_app(app_name)?;
    let matched = validate_route_for_app(route, &app, internal_port.is_some())?;
    debug!(%route, ?matched, "route accepted");

    let Some(port) = internal_port else {
        return ensure_service_and_bind(platform, app_name, RegistrationKind::MetricsEndpoint, route);
    };

    expose_port_for_app(platform, &app.guid, port)?;
    ensure_service_and_bind(
        platform,
        app_name,
        RegistrationKind::SecureEndpoint,
        &format!(":{port}{route}"),
    )
}

/// Creates the service for (`kind`, `config`) if it is missing, then binds it.
///
/// A failed bind after a successful create leaves the service in place.
pub fn ensure_service_and_bind<P: Platform + ?Sized>(
    platform: &P,
    app_name: &str,
    kind: RegistrationKind,
    config: &str,
) -> Result<()> {
    let service_name = generate_service_name(kind, config);

    if find_existing_service(platform, &service_name)? {
        debug!(service = %service_name, "service already exists");
    } else {
        let drain_url = kind.drain_url(config);
        platform.create_user_provided_service(&service_name, &drain_url)?;
        info!(service = %service_name, %drain_url, "created user-provided service");
    }

    platform.bind_service(app_name, &service_name)?;
    info!(app = %app_name, service = %service_name, "bound service");
    Ok(())
}

/// Whether a service named `service_name` exists in the current space.
pub fn find_existing_service<P: Platform + ?Sized>(platform: &P, service_name: &str) -> Result<bool> {
    Ok(platform
        .list_services()?
        .iter()
        .any(|service| service.name == service_name))
}
