//! Reqwest-backed geolocation adapter.
//!
//! Owns transport details only: URL templating, the request timeout, and JSON
//! decoding into [`GeoLocation`]. Every failure collapses to
//! [`GeoLookup::Unavailable`] at the trait boundary.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::GeoLocation;
use crate::domain::geo::{GeoEnricher, GeoLookup};

const IP_PLACEHOLDER: &str = "{ip}";
const USER_AGENT: &str = concat!("clicktrail/", env!("CARGO_PKG_VERSION"));

/// Largest provider payload accepted before decoding.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("lookup URL template must contain {{ip}}: {0}")]
    InvalidTemplate(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("provider payload exceeds {} bytes", MAX_BODY_BYTES)]
    BodyTooLarge,

    #[error("invalid provider payload: {0}")]
    Decode(String),

    #[error("provider reported an error: {0}")]
    Provider(String),
}

#[derive(Debug, Deserialize)]
struct GeoResponseDto {
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    reason: Option<String>,
}

impl GeoResponseDto {
    fn into_location(self) -> Result<GeoLocation, GeoError> {
        match self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => {}
            Some(other) => {
                let reason = self.reason.unwrap_or_else(|| other.to_string());
                return Err(GeoError::Provider(reason));
            }
        }

        Ok(GeoLocation {
            city: non_blank(self.city),
            region: non_blank(self.region),
            country: non_blank(self.country_name).or_else(|| non_blank(self.country)),
            latitude: self.latitude.filter(|v| v.is_finite()),
            longitude: self.longitude.filter(|v| v.is_finite()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns true for addresses a public geolocation provider cannot place.
fn is_unroutable(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_unroutable(&IpAddr::V4(mapped));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local()
        }
    }
}

/// Geolocation over HTTP with a bounded per-request timeout.
///
/// `url_template` must contain `{ip}`, e.g. `https://ipapi.co/{ip}/json/`.
pub struct HttpGeoEnricher {
    client: Client,
    url_template: String,
}

impl HttpGeoEnricher {
    /// # Errors
    ///
    /// Returns an error when the template lacks `{ip}` or the reqwest client
    /// cannot be constructed.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, GeoError> {
        let url_template = url_template.into();
        if !url_template.contains(IP_PLACEHOLDER) {
            return Err(GeoError::InvalidTemplate(url_template));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url_template,
        })
    }

    async fn fetch(&self, ip: IpAddr) -> Result<GeoLocation, GeoError> {
        let url = self.url_template.replace(IP_PLACEHOLDER, &ip.to_string());

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body = read_capped(response).await?;
        let decoded: GeoResponseDto =
            serde_json::from_slice(&body).map_err(|e| GeoError::Decode(e.to_string()))?;

        decoded.into_location()
    }
}

async fn read_capped(mut response: reqwest::Response) -> Result<Vec<u8>, GeoError> {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_BODY_BYTES as u64)
    {
        return Err(GeoError::BodyTooLarge);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(GeoError::BodyTooLarge);
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

#[async_trait]
impl GeoEnricher for HttpGeoEnricher {
    async fn lookup(&self, ip_address: &str) -> GeoLookup {
        let ip = match ip_address.trim().parse::<IpAddr>() {
            Ok(ip) if !is_unroutable(&ip) => ip,
            _ => {
                debug!(ip = %ip_address, "Skipping geo lookup for unroutable address");
                metrics::counter!("geo_lookups_total", "result" => "skipped").increment(1);
                return GeoLookup::Unavailable;
            }
        };

        match self.fetch(ip).await {
            Ok(location) if !location.is_empty() => {
                metrics::counter!("geo_lookups_total", "result" => "enriched").increment(1);
                GeoLookup::Enriched(location)
            }
            Ok(_) => {
                metrics::counter!("geo_lookups_total", "result" => "empty").increment(1);
                GeoLookup::Unavailable
            }
            Err(e) => {
                warn!(ip = %ip, error = %e, "Geo lookup failed");
                metrics::counter!("geo_lookups_total", "result" => "unavailable").increment(1);
                GeoLookup::Unavailable
            }
        }
    }
}
