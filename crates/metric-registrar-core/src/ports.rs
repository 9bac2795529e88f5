//! Container ports exposed by an app.
//!
//! Writes always replace the full list, so every change is a
//! read-modify-write over the current set. Two commands racing on the same
//! app can lose an update; the last writer wins.

use crate::error::{RegistrarError, Result};
use crate::platform::{ApiRequest, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct AppResponse {
    entity: PortsEntity,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PortsEntity {
    #[serde(default)]
    ports: Option<Vec<u16>>,
}

fn app_path(guid: &str) -> String {
    format!("/v2/apps/{guid}")
}

/// Reads `entity.ports` of the app resource. A null port list reads as empty.
pub fn get_ports_for_app<P: Platform + ?Sized>(platform: &P, guid: &str) -> Result<Vec<u16>> {
    let path = app_path(guid);
    let body = platform.curl(&ApiRequest::get(&path))?;
    let response: AppResponse = serde_json::from_str(&body)
        .map_err(|e| RegistrarError::parse(format!("ports of app {guid}"), e))?;
    let ports = response.entity.ports.unwrap_or_default();
    debug!(%guid, ?ports, "read exposed ports");
    Ok(ports)
}

/// Replaces the app's exposed ports with `ports`.
pub fn set_ports_for_app<P: Platform + ?Sized>(platform: &P, guid: &str, ports: &[u16]) -> Result<()> {
    let body = serde_json::to_string(&PortsEntity {
        ports: Some(ports.to_vec()),
    })
    .map_err(|e| RegistrarError::parse("ports body", e))?;
    info!(%guid, ?ports, "writing exposed ports");
    platform.curl(&ApiRequest::put(app_path(guid), body))?;
    Ok(())
}

/// Adds `port` to the app's exposed ports unless it is already there.
pub fn expose_port_for_app<P: Platform + ?Sized>(platform: &P, guid: &str, port: u16) -> Result<()> {
    let mut ports = get_ports_for_app(platform, guid)?;
    if ports.contains(&port) {
        debug!(%guid, port, "port already exposed");
        return Ok(());
    }
    ports.push(port);
    set_ports_for_app(platform, guid, &ports)
}

/// The port a registration config names: the digits between a leading `:`
/// and the first `/` (or the end).
pub fn port_from_config(config: &str) -> Option<u16> {
    let rest = config.strip_prefix(':')?;
    let digits = rest.split_once('/').map_or(rest, |(port, _)| port);
    digits.parse().ok()
}

/// Ports named by `removed` that none of `remaining` still needs.
pub fn ports_to_release<'a>(
    removed: impl IntoIterator<Item = &'a str>,
    remaining: impl IntoIterator<Item = &'a str>,
) -> HashSet<u16> {
    let still_used: HashSet<u16> = remaining.into_iter().filter_map(port_from_config).collect();
    removed
        .into_iter()
        .filter_map(port_from_config)
        .filter(|port| !still_used.contains(port))
        .collect()
}

/// Drops `release` from the app's exposed ports and writes the rest back.
pub fn release_ports_for_app<P: Platform + ?Sized>(
    platform: &P,
    guid: &str,
    release: &HashSet<u16>,
) -> Result<()> {
    let current = get_ports_for_app(platform, guid)?;
    let mut seen = HashSet::new();
    let kept: Vec<u16> = current
        .into_iter()
        .filter(|port| !release.contains(port) && seen.insert(*port))
        .collect();
    set_ports_for_app(platform, guid, &kept)
}
