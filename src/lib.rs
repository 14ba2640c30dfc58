//! A dyndns2-compatible gateway that translates router DDNS update requests
//! into Cloudflare DNS API calls.
//!
//! Routers and DDNS clients send `GET /nic/update?hostname=...&ip=...` with
//! Basic auth where the username is the Cloudflare zone name and the password
//! is an API token with `dns:edit` and `zone:read` permissions. Each request
//! resolves the zone, then for every requested hostname resolves the record
//! and overwrites its content with the new address.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod provider;
