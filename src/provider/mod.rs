pub mod cloudflare;

use serde::{Deserialize, Serialize};

/// A zone as the upstream API reports it. Resolved fresh on every request,
/// never cached.
#[derive(Debug, Default, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A DNS record as the upstream API reports it. Only `content` is interpreted
/// here; every other field rides along in `extra` so the full-record update
/// does not clobber data this gateway knows nothing about.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub zone_id: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
