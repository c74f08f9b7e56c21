//! Per-client rate limiting using a token bucket.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    /// Sustained requests per second.
    pub per_second: u32,
    pub burst_size: u32,
}

impl Quota {
    /// Interval after which one request is replenished.
    ///
    /// Zero for a zero rate, which the governor builder rejects.
    pub fn replenish_period(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.per_second)
            .unwrap_or(Duration::ZERO)
    }
}

/// Redirect and stats traffic: 50 req/s sustained, bursts of 200.
pub const PUBLIC: Quota = Quota {
    per_second: 50,
    burst_size: 200,
};

/// Alias creation: 2 req/s sustained, bursts of 20.
pub const WRITE: Quota = Quota {
    per_second: 2,
    burst_size: 20,
};

type Limiter<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn peer_layer(quota: Quota) -> Limiter<PeerIpKeyExtractor> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(quota.replenish_period())
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

fn proxy_layer(quota: Quota) -> Limiter<SmartIpKeyExtractor> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .period(quota.replenish_period())
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies a per-IP limiter to `router`.
///
/// Requests exceeding the quota receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: socket peer address
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
///   falling back to the peer. Enable only behind a trusted reverse proxy.
///
/// # Example
///
/// ```rust,ignore
/// let writes = rate_limit::apply(Router::new().route("/links", post(h)), rate_limit::WRITE, false);
/// ```
pub fn apply<S>(router: Router<S>, quota: Quota, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(proxy_layer(quota))
    } else {
        router.layer(peer_layer(quota))
    }
}
