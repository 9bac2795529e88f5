//! Recording fakes for the platform and the registration fetcher.

use crate::error::{RegistrarError, Result};
use crate::platform::{ApiRequest, App, AppSummary, HttpMethod, Platform, Route, ServiceSummary, Space};
use crate::registrations::{Registration, RegistrationFetcher, RegistrationKind};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentSpace,
    ListServices,
    CreateUserProvidedService { name: String, drain_url: String },
    BindService { app: String, service: String },
    UnbindService { app: String, service: String },
    DeleteService { service: String },
    GetApp { name: String },
    GetApps,
    Curl(ApiRequest),
}

impl Call {
    pub fn create(name: &str, drain_url: &str) -> Self {
        Self::CreateUserProvidedService {
            name: name.to_string(),
            drain_url: drain_url.to_string(),
        }
    }

    pub fn bind(app: &str, service: &str) -> Self {
        Self::BindService {
            app: app.to_string(),
            service: service.to_string(),
        }
    }

    pub fn unbind(app: &str, service: &str) -> Self {
        Self::UnbindService {
            app: app.to_string(),
            service: service.to_string(),
        }
    }

    pub fn delete(service: &str) -> Self {
        Self::DeleteService {
            service: service.to_string(),
        }
    }

    pub fn curl_get(path: &str) -> Self {
        Self::Curl(ApiRequest::get(path))
    }

    pub fn curl_put(path: &str, body: &str) -> Self {
        Self::Curl(ApiRequest::put(path, body))
    }

    /// Calls that change platform state.
    pub const fn is_mutation(&self) -> bool {
        match self {
            Self::CreateUserProvidedService { .. }
            | Self::BindService { .. }
            | Self::UnbindService { .. }
            | Self::DeleteService { .. } => true,
            Self::Curl(request) => matches!(request.method, HttpMethod::Put),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    CurrentSpace,
    ListServices,
    Create,
    Bind,
    Unbind,
    Delete,
    GetApp,
    GetApps,
    CurlGet,
    CurlPut,
}

/// An in-memory platform with one app, `app-name` / `app-guid`, bound to
/// `app-host.app-domain/app-path`.
pub struct FakePlatform {
    pub services: Vec<String>,
    pub app: App,
    pub apps: Vec<AppSummary>,
    exposed_ports: RefCell<Vec<u16>>,
    curl_responses: HashMap<String, String>,
    failing: Vec<Op>,
    calls: RefCell<Vec<Call>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            app: App {
                guid: "app-guid".to_string(),
                name: "app-name".to_string(),
                routes: vec![Route {
                    host: "app-host".to_string(),
                    domain: "app-domain".to_string(),
                    path: "app-path".to_string(),
                    port: None,
                }],
            },
            apps: vec![AppSummary {
                guid: "app-guid".to_string(),
                name: "app-name".to_string(),
            }],
            exposed_ports: RefCell::new(Vec::new()),
            curl_responses: HashMap::new(),
            failing: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_services(mut self, names: &[&str]) -> Self {
        self.services = names.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_routes(mut self, routes: Vec<Route>) -> Self {
        self.app.routes = routes;
        self
    }

    pub fn with_apps(mut self, apps: &[(&str, &str)]) -> Self {
        self.apps = apps
            .iter()
            .map(|(guid, name)| AppSummary {
                guid: (*guid).to_string(),
                name: (*name).to_string(),
            })
            .collect();
        self
    }

    pub fn with_exposed_ports(self, ports: &[u16]) -> Self {
        *self.exposed_ports.borrow_mut() = ports.to_vec();
        self
    }

    pub fn with_curl(mut self, path: &str, body: impl Into<String>) -> Self {
        self.curl_responses.insert(path.to_string(), body.into());
        self
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failing.push(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn exposed_ports(&self) -> Vec<u16> {
        self.exposed_ports.borrow().clone()
    }

    fn record(&self, call: Call, op: Op) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.contains(&op) {
            return Err(RegistrarError::platform(format!("{op:?}"), "expected"));
        }
        Ok(())
    }

    fn app_path(&self) -> String {
        format!("/v2/apps/{}", self.app.guid)
    }
}

impl Platform for FakePlatform {
    fn current_space(&self) -> Result<Space> {
        self.record(Call::CurrentSpace, Op::CurrentSpace)?;
        Ok(Space {
            guid: "space-guid".to_string(),
            name: "space-name".to_string(),
        })
    }

    fn list_services(&self) -> Result<Vec<ServiceSummary>> {
        self.record(Call::ListServices, Op::ListServices)?;
        Ok(self
            .services
            .iter()
            .map(|name| ServiceSummary { name: name.clone() })
            .collect())
    }

    fn create_user_provided_service(&self, name: &str, drain_url: &str) -> Result<()> {
        self.record(Call::create(name, drain_url), Op::Create)
    }

    fn bind_service(&self, app_name: &str, service_name: &str) -> Result<()> {
        self.record(Call::bind(app_name, service_name), Op::Bind)
    }

    fn unbind_service(&self, app_name: &str, service_name: &str) -> Result<()> {
        self.record(Call::unbind(app_name, service_name), Op::Unbind)
    }

    fn delete_service(&self, service_name: &str) -> Result<()> {
        self.record(Call::delete(service_name), Op::Delete)
    }

    fn get_app(&self, app_name: &str) -> Result<App> {
        self.record(
            Call::GetApp {
                name: app_name.to_string(),
            },
            Op::GetApp,
        )?;
        Ok(self.app.clone())
    }

    fn get_apps(&self) -> Result<Vec<AppSummary>> {
        self.record(Call::GetApps, Op::GetApps)?;
        Ok(self.apps.clone())
    }

    fn curl(&self, request: &ApiRequest) -> Result<String> {
        let op = match request.method {
            HttpMethod::Get => Op::CurlGet,
            HttpMethod::Put => Op::CurlPut,
        };
        self.record(Call::Curl(request.clone()), op)?;

        if let Some(body) = self.curl_responses.get(&request.path) {
            return Ok(body.clone());
        }

        if request.path == self.app_path() {
            if let Some(body) = &request.body {
                let value: serde_json::Value = serde_json::from_str(body)
                    .map_err(|e| RegistrarError::parse("fake PUT body", e))?;
                let ports = value["ports"]
                    .as_array()
                    .map(|ports| {
                        ports
                            .iter()
                            .filter_map(serde_json::Value::as_u64)
                            .filter_map(|p| u16::try_from(p).ok())
                            .collect()
                    })
                    .unwrap_or_default();
                *self.exposed_ports.borrow_mut() = ports;
            }
            let ports = serde_json::to_string(&*self.exposed_ports.borrow())
                .map_err(|e| RegistrarError::parse("fake ports", e))?;
            return Ok(format!(r#"{{"entity":{{"ports":{ports}}}}}"#));
        }

        Ok("{}".to_string())
    }
}

/// Registrations handed out per app guid, regardless of kind filters.
#[derive(Default)]
pub struct FakeFetcher {
    pub registrations: HashMap<String, Vec<Registration>>,
    pub fail: bool,
    pub requested_kinds: RefCell<Vec<Vec<RegistrationKind>>>,
}

impl FakeFetcher {
    pub fn with(app_guid: &str, registrations: Vec<Registration>) -> Self {
        let mut fetcher = Self::default();
        fetcher
            .registrations
            .insert(app_guid.to_string(), registrations);
        fetcher
    }
}

impl RegistrationFetcher for FakeFetcher {
    fn fetch_all(&self, kinds: &[RegistrationKind]) -> Result<HashMap<String, Vec<Registration>>> {
        self.requested_kinds.borrow_mut().push(kinds.to_vec());
        if self.fail {
            return Err(RegistrarError::platform("fetch registrations", "expected"));
        }
        Ok(self.registrations.clone())
    }
}

pub fn registration(name: &str, kind: RegistrationKind, config: &str, bindings: usize) -> Registration {
    Registration {
        name: name.to_string(),
        kind,
        config: config.to_string(),
        number_of_bindings: bindings,
    }
}
