//! In-memory scan message for asynchronous event recording.

use uuid::Uuid;

/// Geo fields supplied by a trusted edge proxy (e.g. `CF-IPCountry`).
///
/// Header-derived hints take precedence over enrichment lookups; a missing
/// hint simply leaves the field to the enricher.
#[derive(Debug, Clone, Default)]
pub struct GeoHint {
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

/// Scan metadata passed from the redirect handler to the background worker.
///
/// Decouples the HTTP response from event persistence: the handler redirects
/// immediately while enrichment and the INSERT happen off the request path.
/// Carries the owner id so the worker never has to look the record up again.
#[derive(Debug, Clone)]
pub struct ScanMessage {
    pub qr_record_id: Uuid,
    pub owner_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub geo_hint: GeoHint,
}

impl ScanMessage {
    pub fn new(
        qr_record_id: Uuid,
        owner_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        geo_hint: GeoHint,
    ) -> Self {
        Self {
            qr_record_id,
            owner_id,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referrer: referrer.map(|s| s.to_string()),
            geo_hint,
        }
    }
}
