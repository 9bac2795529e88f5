//! # metric-registrar-core
//!
//! `metric-registrar-core` holds the registration logic behind the
//! `metric-registrar` CLI: it turns log formats and metrics endpoints into
//! user-provided services, binds them to apps and keeps the app's exposed
//! ports in line with the secure endpoints registered against it.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph TD
//!     CLI[metric-registrar-cli] -->|Uses| Core[metric-registrar-core]
//!     CLI -->|Implements| Platform
//!
//!     Core --> Register[register]
//!     Core --> Unregister[unregister]
//!     Core --> List[list]
//!     Register --> Naming[naming]
//!     Register --> Routes[routes]
//!     Register --> Ports[ports]
//!     Unregister --> Registrations[registrations]
//!     Unregister --> Ports
//!     Register --> Platform[platform::Platform]
//!     Registrations --> Platform
//! ```
//!
//! ## Key Modules
//!
//! *   [`platform`]: The typed capability trait every platform call goes through.
//! *   [`naming`]: Deterministic, length-bounded service names.
//! *   [`register`] / [`unregister`]: The create-or-bind and unbind-or-delete flows.
//! *   [`routes`]: Matching a requested route against the app's bound routes.
//! *   [`ports`]: Reading and rewriting an app's exposed container ports.
//! *   [`registrations`]: Reconstructing registrations from drain URLs and bindings.
//! *   [`list`]: Tables of registrations per app.

// =========================================================================
//  Strict Lints: Safety, Hygiene, and Documentation
// =========================================================================

// 1. Logic & Safety
#![warn(clippy::let_underscore_must_use)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

// 2. Numeric Safety (ports are u16 on the wire and in memory)
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]

// 3. Observability
#![warn(clippy::print_stderr)]
#![warn(clippy::print_stdout)]

// 4. Import Hygiene
#![warn(clippy::wildcard_imports)]
#![warn(clippy::shadow_unrelated)]

// 5. Documentation
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod error;
#[doc(inline)]
pub use error::{RegistrarError, Result};
pub mod list;
pub mod naming;
pub mod platform;
#[doc(inline)]
pub use platform::{ApiRequest, App, AppSummary, HttpMethod, Platform, Route, ServiceSummary, Space};
pub mod ports;
pub mod register;
#[doc(inline)]
pub use register::{MetricsEndpointOptions, register_log_format, register_metrics_endpoint};
pub mod registrations;
#[doc(inline)]
pub use registrations::{Registration, RegistrationFetcher, RegistrationKind, SpaceRegistrationFetcher};
pub mod routes;
pub mod unregister;
#[doc(inline)]
pub use unregister::{MetricsEndpointFilter, unregister_log_format, unregister_metrics_endpoint};

#[cfg(test)]
mod testing;
