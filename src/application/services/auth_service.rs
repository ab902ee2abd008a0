//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::Account;
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw API token with HMAC-SHA256 under the server signing secret.
///
/// Returns a 64-character lowercase hex-encoded MAC. Shared with the admin
/// CLI, which stores this hash when issuing tokens.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// storage and comparison. An attacker with read-only access to the database
/// cannot verify or forge tokens without the server-side secret.
pub struct AuthService<R: AccountRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and resolves it to its account.
    ///
    /// On success, updates the account's `last_used_at` timestamp for
    /// monitoring. That write is best-effort and never fails the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token matches no account or
    /// the account is revoked. Returns [`AppError::Internal`] on database
    /// errors.
    pub async fn authenticate(&self, token: &str) -> Result<Account, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let account = self
            .repository
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or revoked token" }),
                )
            })?;

        let _ = self.repository.touch_last_used(&token_hash).await;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Plan;
    use crate::domain::repositories::MockAccountRepository;
    use chrono::Utc;

    const SECRET: &str = "test-signing-secret";

    fn test_account(id: i64) -> Account {
        Account {
            id,
            email: "owner@example.com".to_string(),
            plan: Plan::Free,
            revoked: false,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockAccountRepository::new();

        let token = "valid-token";
        let expected_hash = hash_token(SECRET, token);

        let account = test_account(3);
        mock_repo
            .expect_find_by_token_hash()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        mock_repo
            .expect_touch_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        let result = service.authenticate(token).await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let mut mock_repo = MockAccountRepository::new();

        mock_repo
            .expect_find_by_token_hash()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_survives_touch_failure() {
        let mut mock_repo = MockAccountRepository::new();

        let account = test_account(1);
        mock_repo
            .expect_find_by_token_hash()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        mock_repo
            .expect_touch_last_used()
            .times(1)
            .returning(|_| Err(AppError::internal("db down", serde_json::json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        assert!(service.authenticate("token").await.is_ok());
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token(SECRET, "test-token");
        let hash2 = hash_token(SECRET, "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
        assert_ne!(hash_token(SECRET, "token1"), hash_token(SECRET, "token2"));
    }
}
