//! [`Platform`] backed by the `cf` executable.
//!
//! Every call spawns `cf` and waits for it. Raw API access goes through
//! `cf curl`, which reuses the operator's login and target.

use crate::config::{CfConfig, Settings};
use crate::hints;
use metric_registrar_core::{
    ApiRequest, App, AppSummary, HttpMethod, Platform, RegistrarError, Result, Route,
    ServiceSummary, Space,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    guid: String,
}

#[derive(Debug, Deserialize)]
struct AppResource {
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct SpaceSummary {
    #[serde(default)]
    apps: Vec<SpaceApp>,
    #[serde(default)]
    services: Vec<SpaceService>,
}

#[derive(Debug, Deserialize)]
struct SpaceApp {
    guid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpaceService {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AppSummaryBody {
    guid: String,
    name: String,
    #[serde(default)]
    routes: Vec<RouteBody>,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    domain: DomainBody,
}

#[derive(Debug, Deserialize)]
struct DomainBody {
    name: String,
}

impl From<RouteBody> for Route {
    fn from(route: RouteBody) -> Self {
        Self {
            host: route.host.unwrap_or_default(),
            domain: route.domain.name,
            path: route.path.unwrap_or_default(),
            port: route.port,
        }
    }
}

/// Error body returned by the v2 API with a zero `cf curl` exit status.
#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: String,
    #[serde(default)]
    description: String,
}

pub struct CfCli {
    binary: PathBuf,
    cf_home: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl CfCli {
    pub fn new(settings: &Settings) -> Self {
        Self {
            binary: settings.cf_binary.clone(),
            cf_home: settings.cf_home.clone(),
            config_path: settings.cf_config_path(),
        }
    }

    /// Runs `cf <args>` and returns its stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let operation = args.first().copied().unwrap_or("cf");
        debug!(binary = %self.binary.display(), ?args, "running cf");

        let mut command = Command::new(&self.binary);
        command.args(args).env("CF_COLOR", "false");
        if let Some(home) = &self.cf_home {
            command.env("CF_HOME", home);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RegistrarError::platform(operation, hints::cf_not_found(&self.binary))
            } else {
                RegistrarError::platform(operation, e.to_string())
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(RegistrarError::platform(operation, message));
        }
        Ok(stdout)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.curl(&ApiRequest::get(path))?;
        serde_json::from_str(&body)
            .map_err(|e| RegistrarError::parse(format!("response from {path}"), e))
    }

    fn space_summary(&self) -> Result<SpaceSummary> {
        let space = self.current_space()?;
        self.get_json(&format!("/v2/spaces/{}/summary", space.guid))
    }
}

impl Platform for CfCli {
    fn current_space(&self) -> Result<Space> {
        let path = self
            .config_path
            .as_deref()
            .ok_or_else(|| RegistrarError::platform("current space", hints::LOGIN))?;
        CfConfig::load(path)?.space()
    }

    fn list_services(&self) -> Result<Vec<ServiceSummary>> {
        Ok(self
            .space_summary()?
            .services
            .into_iter()
            .map(|service| ServiceSummary { name: service.name })
            .collect())
    }

    fn create_user_provided_service(&self, name: &str, drain_url: &str) -> Result<()> {
        self.run(&["create-user-provided-service", name, "-l", drain_url])?;
        Ok(())
    }

    fn bind_service(&self, app_name: &str, service_name: &str) -> Result<()> {
        self.run(&["bind-service", app_name, service_name])?;
        Ok(())
    }

    fn unbind_service(&self, app_name: &str, service_name: &str) -> Result<()> {
        self.run(&["unbind-service", app_name, service_name])?;
        Ok(())
    }

    fn delete_service(&self, service_name: &str) -> Result<()> {
        self.run(&["delete-service", service_name, "-f"])?;
        Ok(())
    }

    fn get_app(&self, app_name: &str) -> Result<App> {
        let space = self.current_space()?;
        let query: String = url::form_urlencoded::byte_serialize(app_name.as_bytes()).collect();
        let page: Page<AppResource> =
            self.get_json(&format!("/v2/spaces/{}/apps?q=name:{query}", space.guid))?;

        let Some(resource) = page.resources.into_iter().next() else {
            return Err(RegistrarError::platform(
                "get app",
                format!("app '{app_name}' not found"),
            ));
        };

        let summary: AppSummaryBody =
            self.get_json(&format!("/v2/apps/{}/summary", resource.metadata.guid))?;
        Ok(App {
            guid: summary.guid,
            name: summary.name,
            routes: summary.routes.into_iter().map(Route::from).collect(),
        })
    }

    fn get_apps(&self) -> Result<Vec<AppSummary>> {
        Ok(self
            .space_summary()?
            .apps
            .into_iter()
            .map(|app| AppSummary {
                guid: app.guid,
                name: app.name,
            })
            .collect())
    }

    /// The PUT body goes to `cf` as its own argument; no shell is involved,
    /// so it is passed without quoting.
    fn curl(&self, request: &ApiRequest) -> Result<String> {
        let mut args = vec!["curl", request.path.as_str()];
        if request.method != HttpMethod::Get {
            args.extend(["-X", request.method.as_str()]);
        }
        if let Some(body) = &request.body {
            args.extend(["-d", body.as_str()]);
        }

        let body = self.run(&args)?;
        if let Ok(error) = serde_json::from_str::<ApiError>(&body) {
            let message = if error.description.is_empty() {
                error.error_code
            } else {
                error.description
            };
            return Err(RegistrarError::platform(
                format!("{} {}", request.method, request.path),
                message,
            ));
        }
        Ok(body)
    }
}
