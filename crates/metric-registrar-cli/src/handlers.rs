use anyhow::Result;
use crossterm::style::Stylize;
use metric_registrar_core::{
    MetricsEndpointFilter, MetricsEndpointOptions, SpaceRegistrationFetcher, list,
    register_log_format, register_metrics_endpoint, unregister_log_format,
    unregister_metrics_endpoint,
};

use crate::cf::CfCli;
use crate::cli::Commands;
use crate::config::Settings;
use crate::style;

pub fn run(command: &Commands, settings: &Settings) -> Result<()> {
    let platform = CfCli::new(settings);
    let fetcher = SpaceRegistrationFetcher::new(&platform);

    match command {
        Commands::RegisterLogFormat { app_name, format } => {
            register_log_format(&platform, app_name, format)?;
            println!(
                "{} Registered log format {} for {}",
                style::CHECK,
                format.as_str().bold(),
                app_name.as_str().bold()
            );
        }
        Commands::RegisterMetricsEndpoint {
            app_name,
            path,
            internal_port,
            insecure,
        } => {
            let options = MetricsEndpointOptions {
                internal_port: *internal_port,
                insecure: *insecure,
            };
            register_metrics_endpoint(&platform, app_name, path, options)?;
            println!(
                "{} Registered metrics endpoint {} for {}",
                style::CHECK,
                path.as_str().bold(),
                app_name.as_str().bold()
            );
        }
        Commands::UnregisterLogFormat { app_name, format } => {
            unregister_log_format(&platform, &fetcher, app_name, format)?;
            println!(
                "{} Unregistered log formats for {}",
                style::CHECK,
                app_name.as_str().bold()
            );
        }
        Commands::UnregisterMetricsEndpoint {
            app_name,
            path,
            internal_port,
        } => {
            let filter = MetricsEndpointFilter {
                path: path.clone(),
                internal_port: *internal_port,
            };
            unregister_metrics_endpoint(&platform, &fetcher, app_name, &filter)?;
            println!(
                "{} Unregistered metrics endpoints for {}",
                style::CHECK,
                app_name.as_str().bold()
            );
        }
        Commands::RegisteredLogFormats { app } => {
            let table = list::registered_log_formats(&platform, &fetcher, app.as_deref())?;
            print!("{table}");
        }
        Commands::RegisteredMetricsEndpoints { app } => {
            let table = list::registered_metrics_endpoints(&platform, &fetcher, app.as_deref())?;
            print!("{table}");
        }
    }

    Ok(())
}
