//! Account entity and subscription plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Subscription plan controlling quotas.
///
/// Stored as a lowercase text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Maximum number of active QR records, `None` meaning unlimited.
    pub fn qr_limit(&self) -> Option<i64> {
        match self {
            Self::Free => Some(5),
            Self::Pro | Self::Enterprise => None,
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::Free
    }
}

#[derive(Debug, Error)]
#[error("unknown plan: {0}")]
pub struct ParsePlanError(String);

impl TryFrom<String> for Plan {
    type Error = ParsePlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(ParsePlanError(other.to_string())),
        }
    }
}

/// An authenticated account.
///
/// Resolved from a Bearer token by the auth middleware; handlers trust this
/// identity and perform their own ownership checks against `id`.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub plan: Plan,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_limits() {
        assert_eq!(Plan::Free.qr_limit(), Some(5));
        assert_eq!(Plan::Pro.qr_limit(), None);
        assert_eq!(Plan::Enterprise.qr_limit(), None);
    }

    #[test]
    fn test_plan_round_trip() {
        for s in ["free", "pro", "enterprise"] {
            let plan = Plan::try_from(s.to_string()).unwrap();
            assert_eq!(plan.as_str(), s);
        }
    }

    #[test]
    fn test_plan_rejects_unknown() {
        assert!(Plan::try_from("platinum".to_string()).is_err());
    }
}
