use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::{DnsRecord, Zone};
use crate::error::GatewayError;

/// Thin client over the three Cloudflare API calls one update cycle needs:
/// resolve a zone by name, resolve a record by name within the zone, and
/// replace a record. The bearer token comes from the request's Basic-auth
/// password, so a client is constructed per request around the shared
/// connection pool.
pub struct CloudflareApi {
    client: Client,
    api_base: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    success: bool,
    #[serde(default)]
    result: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ItemEnvelope<T> {
    success: bool,
    #[serde(default)]
    result: Option<T>,
}

impl CloudflareApi {
    pub fn new(client: Client, api_base: &str, token: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Looks up a zone by exact name. On multiple matches the first result
    /// returned by upstream wins; upstream ordering is taken as-is.
    pub async fn find_zone(&self, name: &str) -> Result<Zone, GatewayError> {
        let url = format!("{}/zones", self.api_base);

        let body: ListEnvelope<Zone> = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to query zones: {e}")))?
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to parse zone response: {e}")))?;

        if !body.success {
            return Err(GatewayError::Upstream(format!(
                "Failed to find zone '{name}'"
            )));
        }

        debug!("Zone lookup '{}' returned {} match(es)", name, body.result.len());

        body.result
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Upstream(format!("Failed to find zone '{name}'")))
    }

    /// Looks up a DNS record by exact name within a zone. Same selection and
    /// failure policy as [`find_zone`](Self::find_zone).
    pub async fn find_record(&self, zone: &Zone, name: &str) -> Result<DnsRecord, GatewayError> {
        let url = format!("{}/zones/{}/dns_records", self.api_base, zone.id);

        let body: ListEnvelope<DnsRecord> = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to query dns records: {e}")))?
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to parse record response: {e}")))?;

        if !body.success {
            return Err(GatewayError::Upstream(format!(
                "Failed to find dns record '{name}'"
            )));
        }

        body.result
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Upstream(format!("Failed to find dns record '{name}'")))
    }

    /// Sets the record's content and submits the whole record back as a full
    /// replace. The record must be the representation previously fetched via
    /// [`find_record`](Self::find_record) so unrelated fields survive the PUT.
    pub async fn update_record(
        &self,
        mut record: DnsRecord,
        value: &str,
    ) -> Result<DnsRecord, GatewayError> {
        record.content = value.to_string();

        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.api_base, record.zone_id, record.id
        );

        let body: ItemEnvelope<DnsRecord> = self
            .client
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&record)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to submit record update: {e}")))?
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to parse update response: {e}")))?;

        if !body.success {
            return Err(GatewayError::Upstream(
                "Failed to update dns record".to_string(),
            ));
        }

        body.result
            .ok_or_else(|| GatewayError::Upstream("Failed to update dns record".to_string()))
    }
}
