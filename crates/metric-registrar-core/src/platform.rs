//! The platform capability every command talks through.
//!
//! One method per operation the registrar needs from the control plane.
//! Implementations are synchronous and blocking; there are no retries or
//! timeouts at this layer.

use crate::error::Result;
use std::fmt;

/// The space commands operate in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Space {
    pub guid: String,
    pub name: String,
}

/// A service instance visible in the current space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceSummary {
    pub name: String,
}

/// An app as listed in the current space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppSummary {
    pub guid: String,
    pub name: String,
}

/// One route bound to an app.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub host: String,
    pub domain: String,
    pub path: String,
    pub port: Option<u16>,
}

impl Route {
    /// `[host "."] domain [":" port]`, the authority a request to this route uses.
    pub fn authority(&self) -> String {
        let mut authority = if self.host.is_empty() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.host, self.domain)
        };
        if let Some(port) = self.port.filter(|p| *p != 0) {
            authority = format!("{authority}:{port}");
        }
        authority
    }

    /// The route path with exactly one leading slash.
    pub fn normalized_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

/// An app together with its bound routes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct App {
    pub guid: String,
    pub name: String,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw API call passed through to the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn put(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Put,
            path: path.into(),
            body: Some(body.into()),
        }
    }
}

/// Typed access to the control plane.
pub trait Platform {
    fn current_space(&self) -> Result<Space>;

    fn list_services(&self) -> Result<Vec<ServiceSummary>>;

    fn create_user_provided_service(&self, name: &str, drain_url: &str) -> Result<()>;

    fn bind_service(&self, app_name: &str, service_name: &str) -> Result<()>;

    fn unbind_service(&self, app_name: &str, service_name: &str) -> Result<()>;

    /// Deletes a service without prompting.
    fn delete_service(&self, service_name: &str) -> Result<()>;

    fn get_app(&self, app_name: &str) -> Result<App>;

    fn get_apps(&self) -> Result<Vec<AppSummary>>;

    /// Issues a raw API request and returns the response body.
    fn curl(&self, request: &ApiRequest) -> Result<String>;
}
