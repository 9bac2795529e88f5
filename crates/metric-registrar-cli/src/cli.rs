use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metric-registrar")]
#[command(version)]
#[command(
    about = "Register app log formats and metrics endpoints as user-provided services",
    long_about = None
)]
pub struct Cli {
    /// The cf CLI executable to drive
    #[arg(
        long,
        global = true,
        env = "METRIC_REGISTRAR_CF_BINARY",
        default_value = "cf"
    )]
    pub cf_binary: PathBuf,

    /// Directory holding the cf CLI's `.cf/config.json` (default: home directory)
    #[arg(long, global = true, env = "CF_HOME")]
    pub cf_home: Option<PathBuf>,

    /// Log every platform call to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register a structured log format for an app
    RegisterLogFormat {
        /// Name of the app
        app_name: String,
        /// Log format, e.g. json or dogstatsd
        format: String,
    },
    /// Register a metrics endpoint for an app
    ///
    /// PATH is either a path on one of the app's routes (`/metrics`) or a full
    /// route (`app.example.com/metrics`). With --internal-port the endpoint is
    /// scraped over the container network and PATH must not name a host.
    RegisterMetricsEndpoint {
        /// Name of the app
        app_name: String,
        /// Route or path of the endpoint
        path: String,
        /// Port the app serves metrics on inside the container
        #[arg(short = 'p', long)]
        internal_port: Option<u16>,
        /// Scrape the endpoint through the app's public route
        #[arg(short = 'k', long)]
        insecure: bool,
    },
    /// Unregister log formats from an app
    UnregisterLogFormat {
        /// Name of the app
        app_name: String,
        /// Only unregister this format (default: all)
        #[arg(short, long, default_value = "")]
        format: String,
    },
    /// Unregister metrics endpoints from an app
    UnregisterMetricsEndpoint {
        /// Name of the app
        app_name: String,
        /// Only unregister this path (default: all)
        #[arg(short, long, default_value = "")]
        path: String,
        /// Only unregister endpoints on this internal port
        #[arg(long)]
        internal_port: Option<u16>,
    },
    /// List registered log formats
    RegisteredLogFormats {
        /// Only show this app
        #[arg(short, long)]
        app: Option<String>,
    },
    /// List registered metrics endpoints
    RegisteredMetricsEndpoints {
        /// Only show this app
        #[arg(short, long)]
        app: Option<String>,
    },
}
