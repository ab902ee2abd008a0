//! Repository trait for account lookup by API token.

use crate::domain::entities::Account;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for resolving API tokens to accounts.
///
/// Tokens are stored only as HMAC-SHA256 hashes; the raw token never
/// reaches this boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds the non-revoked account matching a token hash.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Account>, AppError>;

    /// Records token usage for monitoring. Best-effort.
    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError>;
}
