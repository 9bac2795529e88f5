//! Service names derived from a registration kind and its config.

use crate::registrations::RegistrationKind;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha1::{Digest, Sha1};

/// Longest service name the control plane accepts.
pub const MAX_SERVICE_NAME_LEN: usize = 50;

/// Replaces `/` with `-`, drops `:` and trims dashes from both ends.
pub fn sanitize_config(config: &str) -> String {
    config
        .replace('/', "-")
        .replace(':', "")
        .trim_matches('-')
        .to_string()
}

/// Builds `<kind>-<sanitized config>`.
///
/// Names over [`MAX_SERVICE_NAME_LEN`] swap the config part for the unpadded
/// URL-safe base64 of its SHA-1, so the same inputs always land on the same
/// service and re-registering finds it again.
pub fn generate_service_name(kind: RegistrationKind, config: &str) -> String {
    let cleaned = sanitize_config(config);
    let name = format!("{}-{cleaned}", kind.as_str());
    if name.len() <= MAX_SERVICE_NAME_LEN {
        return name;
    }

    let digest = Sha1::digest(cleaned.as_bytes());
    format!("{}-{}", kind.as_str(), URL_SAFE_NO_PAD.encode(digest))
}
