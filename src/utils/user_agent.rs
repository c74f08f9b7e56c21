//! Coarse `User-Agent` classification for click attribution.

use axum::http::header::{self, AsHeaderName};
use axum::http::HeaderMap;
use regex::Regex;
use std::sync::LazyLock;

pub const UNKNOWN: &str = "unknown";

const X_CLIENT_OS: &str = "x-client-os";
const X_CLIENT_DEVICE: &str = "x-client-device";

// Order matters: iPadOS and Android both advertise a desktop family too.
static OS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)iphone|ipad|ipod", "iOS"),
        (r"(?i)android", "Android"),
        (r"(?i)\bcros\b", "ChromeOS"),
        (r"(?i)windows", "Windows"),
        (r"(?i)mac os x|macintosh", "macOS"),
        (r"(?i)linux|x11", "Linux"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("static OS pattern"), label))
    .collect()
});

static BOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)bot\b|crawler|spider|slurp|curl/|wget/|python-requests|httpclient|headless")
        .expect("static bot pattern")
});

static TABLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ipad|tablet|kindle|silk/").expect("static tablet pattern")
});

static MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mobi|iphone|ipod|android.*mobile|windows phone").expect("static mobile pattern")
});

/// Operating system and device class derived from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    pub operating_system: String,
    pub device_class: String,
}

/// Classifies a raw `User-Agent` string.
pub fn classify(user_agent: &str) -> ClientProfile {
    let operating_system = OS_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(user_agent))
        .map_or(UNKNOWN, |(_, label)| *label);

    let device_class = if user_agent.trim().is_empty() {
        UNKNOWN
    } else if BOT.is_match(user_agent) {
        "bot"
    } else if is_tablet(user_agent) {
        "tablet"
    } else if MOBILE.is_match(user_agent) {
        "mobile"
    } else if matches!(operating_system, "Windows" | "macOS" | "Linux" | "ChromeOS") {
        "desktop"
    } else {
        UNKNOWN
    };

    ClientProfile {
        operating_system: operating_system.to_string(),
        device_class: device_class.to_string(),
    }
}

// Android tablets are the Android agents that omit "Mobile".
fn is_tablet(user_agent: &str) -> bool {
    let lower = user_agent.to_ascii_lowercase();
    if lower.contains("android") {
        return !lower.contains("mobile");
    }
    TABLET.is_match(user_agent)
}

/// Builds the profile for a request, honouring upstream overrides.
///
/// `X-Client-OS` and `X-Client-Device` take precedence over `User-Agent`.
pub fn profile_from_headers(headers: &HeaderMap) -> ClientProfile {
    let mut profile = classify(header_value(headers, header::USER_AGENT).unwrap_or_default());

    if let Some(os) = header_value(headers, X_CLIENT_OS) {
        profile.operating_system = os.to_string();
    }
    if let Some(device) = header_value(headers, X_CLIENT_DEVICE) {
        profile.device_class = device.to_string();
    }

    profile
}

fn header_value(headers: &HeaderMap, name: impl AsHeaderName) -> Option<&str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
