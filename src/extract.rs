//! Credential and query-parameter extraction for update requests.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::GatewayError;

/// Decoded Basic-auth pair. The username is the zone name, the password a
/// Cloudflare API token. Derived once per request and dropped with it; never
/// logged.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Raw query parameters as DDNS clients send them. `hostname`/`host` and
/// `ip`/`myip`/`dnsto` are aliases accepted for client compatibility.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    hostname: Option<String>,
    host: Option<String>,
    ip: Option<String>,
    myip: Option<String>,
    dnsto: Option<String>,
}

/// Validated update inputs.
pub struct UpdateParams {
    /// Requested hostnames in request order, not deduplicated.
    pub hostnames: Vec<String>,
    pub ip: String,
    /// True when `dnsto` supplied the address; selects the XML-flavored
    /// success body some legacy devices expect.
    pub legacy_format: bool,
}

/// Decodes an `Authorization` header value of scheme `Basic` into credentials,
/// splitting the payload on the first colon.
pub fn parse_basic_auth(header: &str) -> Result<Credentials, GatewayError> {
    let payload = header
        .strip_prefix("Basic ")
        .ok_or(GatewayError::MalformedCredentials)?;

    let decoded = BASE64
        .decode(payload.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(GatewayError::MalformedCredentials)?;

    if decoded.bytes().any(|b| b <= 0x1f || b == 0x7f) {
        return Err(GatewayError::MalformedCredentials);
    }

    let (username, password) = decoded
        .split_once(':')
        .ok_or(GatewayError::MalformedCredentials)?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validates the hostname and address parameter families. An empty parameter
/// counts as absent, so `ip=` falls through to `myip`, matching the behavior
/// clients in the field rely on.
pub fn verify_parameters(query: &UpdateQuery) -> Result<UpdateParams, GatewayError> {
    let hostnames = non_empty(&query.hostname)
        .or_else(|| non_empty(&query.host))
        .ok_or(GatewayError::MissingHostname)?;

    let dnsto = non_empty(&query.dnsto);
    let ip = non_empty(&query.ip)
        .or_else(|| non_empty(&query.myip))
        .or(dnsto)
        .ok_or(GatewayError::MissingIp)?;

    Ok(UpdateParams {
        hostnames: hostnames.split(',').map(str::to_string).collect(),
        ip: ip.to_string(),
        legacy_format: dnsto.is_some(),
    })
}
