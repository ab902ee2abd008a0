//! Enrichment collaborator interface for scan metadata.

use async_trait::async_trait;

/// Best-effort classification of a scanning client.
///
/// Any subset of fields may be `None`; a lookup miss is not an error and
/// must never block event recording.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
}

/// External collaborator deriving location and device classification from
/// raw request metadata.
///
/// # Implementations
///
/// - [`crate::infrastructure::enrichment::WootheeEnricher`] - user-agent classification
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanEnricher: Send + Sync {
    /// Classifies a client from its IP and user-agent strings.
    ///
    /// Infallible by contract: failures degrade to empty fields.
    async fn enrich<'a, 'b>(&self, ip: Option<&'a str>, user_agent: Option<&'b str>)
        -> Enrichment;
}
