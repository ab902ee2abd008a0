//! User-agent based scan enrichment.

use async_trait::async_trait;
use woothee::parser::Parser;

use crate::domain::enrichment::{Enrichment, ScanEnricher};

/// Enricher classifying clients from the User-Agent header via `woothee`.
///
/// Geo fields are left empty here: in production deployments the edge proxy
/// supplies country/city headers which the redirect handler captures as
/// hints, and those take precedence in the scan worker anyway. An IP-level
/// lookup backend can be slotted in behind the same trait.
pub struct WootheeEnricher {
    parser: Parser,
}

impl WootheeEnricher {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl Default for WootheeEnricher {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps woothee's category taxonomy onto the coarse device classes the
/// analytics dashboard groups by.
fn device_type_from_category(category: &str) -> Option<&'static str> {
    match category {
        "pc" => Some("desktop"),
        "smartphone" | "mobilephone" => Some("mobile"),
        "crawler" => Some("bot"),
        "appliance" => Some("appliance"),
        "UNKNOWN" => None,
        _ => Some("other"),
    }
}

fn known(value: &str) -> Option<String> {
    if value.is_empty() || value == "UNKNOWN" {
        None
    } else {
        Some(value.to_string())
    }
}

#[async_trait]
impl ScanEnricher for WootheeEnricher {
    async fn enrich<'a, 'b>(
        &self,
        _ip: Option<&'a str>,
        user_agent: Option<&'b str>,
    ) -> Enrichment {
        let ua = match user_agent {
            Some(ua) if !ua.is_empty() => ua,
            _ => return Enrichment::default(),
        };

        match self.parser.parse(ua) {
            Some(result) => Enrichment {
                device_type: device_type_from_category(result.category)
                    .map(|s| s.to_string()),
                browser: known(result.name),
                os: known(result.os),
                ..Enrichment::default()
            },
            None => Enrichment::default(),
        }
    }
}
