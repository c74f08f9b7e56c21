//! Request metadata captured for a click.

/// Who clicked, from where, on what.
///
/// Built by the redirect handler from request headers and handed to
/// [`crate::application::services::LinkResolver::resolve_and_record`]. The
/// identity and user-agent labels are opaque strings supplied by upstream
/// layers; the core never interprets them.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler with request metadata
/// 2. Passed through the resolver to [`crate::application::services::ClickRecorder`]
/// 3. Enriched with geolocation and converted to
///    [`crate::domain::entities::NewClickEvent`] for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickContext {
    pub user_id: String,
    pub ip_address: String,
    pub operating_system: String,
    pub device_class: String,
}

impl ClickContext {
    /// Creates a new click context.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let ctx = ClickContext::new("user-42", "203.0.113.9", "Android", "mobile");
    /// ```
    pub fn new(
        user_id: impl Into<String>,
        ip_address: impl Into<String>,
        operating_system: impl Into<String>,
        device_class: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            ip_address: ip_address.into(),
            operating_system: operating_system.into(),
            device_class: device_class.into(),
        }
    }
}
