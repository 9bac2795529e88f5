//! Registrations reconstructed from user-provided services.
//!
//! A registration is a user-provided service whose drain URL reads
//! `<kind>://<config>`. Nothing is cached: every fetch walks the space's
//! services and their bindings again.

use crate::error::{RegistrarError, Result};
use crate::platform::{ApiRequest, Platform};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// The protocol tag at the front of a drain URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    /// A structured log format (`json`, `DogStatsD`, ...).
    StructuredFormat,
    /// A metrics endpoint scraped over the app's public route.
    MetricsEndpoint,
    /// A metrics endpoint scraped on an internal container port.
    SecureEndpoint,
}

impl RegistrationKind {
    pub const METRICS: [Self; 2] = [Self::MetricsEndpoint, Self::SecureEndpoint];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StructuredFormat => "structured-format",
            Self::MetricsEndpoint => "metrics-endpoint",
            Self::SecureEndpoint => "secure-endpoint",
        }
    }

    /// The drain URL stored on the service for `config`.
    pub fn drain_url(self, config: &str) -> String {
        format!("{}://{config}", self.as_str())
    }
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationKind {
    type Err = RegistrarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "structured-format" => Ok(Self::StructuredFormat),
            "metrics-endpoint" => Ok(Self::MetricsEndpoint),
            "secure-endpoint" => Ok(Self::SecureEndpoint),
            other => Err(RegistrarError::validation(format!(
                "unknown registration type '{other}'"
            ))),
        }
    }
}

/// One registration as seen from one bound app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub kind: RegistrationKind,
    pub config: String,
    /// Bindings of the service across all apps.
    pub number_of_bindings: usize,
}

impl Registration {
    /// Parses `<kind>://<config>`; anything else is not a registration.
    pub fn from_drain_url(name: &str, drain_url: &str) -> Option<Self> {
        let parts: Vec<&str> = drain_url.split("://").collect();
        let [kind, config] = parts.as_slice() else {
            return None;
        };
        let kind = kind.parse().ok()?;

        Some(Self {
            name: name.to_string(),
            kind,
            config: (*config).to_string(),
            number_of_bindings: 0,
        })
    }
}

/// Source of registrations, keyed by app guid.
pub trait RegistrationFetcher {
    fn fetch_all(&self, kinds: &[RegistrationKind]) -> Result<HashMap<String, Vec<Registration>>>;

    fn fetch(&self, app_guid: &str, kinds: &[RegistrationKind]) -> Result<Vec<Registration>> {
        let mut all = self.fetch_all(kinds)?;
        Ok(all.remove(app_guid).unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<T>,
    next_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Resource<E> {
    entity: E,
}

#[derive(Debug, Deserialize)]
struct ServiceEntity {
    name: String,
    #[serde(default)]
    syslog_drain_url: Option<String>,
    #[serde(default)]
    service_bindings_url: String,
}

#[derive(Debug, Deserialize)]
struct BindingEntity {
    app_guid: String,
}

/// Fetches registrations from the user-provided services of the targeted space.
pub struct SpaceRegistrationFetcher<'a, P: Platform + ?Sized> {
    platform: &'a P,
}

impl<'a, P: Platform + ?Sized> SpaceRegistrationFetcher<'a, P> {
    pub const fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    fn paged<T: DeserializeOwned>(&self, first: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first.to_string());

        while let Some(path) = next.take() {
            debug!(%path, "fetching page");
            let body = self.platform.curl(&ApiRequest::get(&path))?;
            let page: Page<T> = serde_json::from_str(&body)
                .map_err(|e| RegistrarError::parse(format!("response from {path}"), e))?;
            items.extend(page.resources);
            next = page.next_url.filter(|url| !url.is_empty());
        }

        Ok(items)
    }
}

impl<P: Platform + ?Sized> RegistrationFetcher for SpaceRegistrationFetcher<'_, P> {
    fn fetch_all(&self, kinds: &[RegistrationKind]) -> Result<HashMap<String, Vec<Registration>>> {
        let space = self.platform.current_space()?;
        let services: Vec<Resource<ServiceEntity>> = self.paged(&format!(
            "/v2/user_provided_service_instances?q=space_guid:{}",
            space.guid
        ))?;

        let mut registrations: HashMap<String, Vec<Registration>> = HashMap::new();
        for Resource { entity: service } in services {
            let drain_url = service.syslog_drain_url.as_deref().unwrap_or_default();
            let Some(mut registration) = Registration::from_drain_url(&service.name, drain_url)
            else {
                if !drain_url.is_empty() {
                    warn!(service = %service.name, %drain_url, "skipping non-registration service");
                }
                continue;
            };
            if !kinds.contains(&registration.kind) {
                continue;
            }

            if service.service_bindings_url.is_empty() {
                debug!(service = %service.name, "service has no bindings url");
                continue;
            }
            let bindings: Vec<Resource<BindingEntity>> =
                self.paged(&service.service_bindings_url)?;
            registration.number_of_bindings = bindings.len();

            for Resource { entity: binding } in bindings {
                registrations
                    .entry(binding.app_guid)
                    .or_default()
                    .push(registration.clone());
            }
        }

        Ok(registrations)
    }
}
