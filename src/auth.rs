/// Authentication extractors and utilities
use crate::{context::AppContext, error::AmoraError, store::StoreKey};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a password
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compare a password against a stored digest
pub fn verify_password(password: &str, digest: &str) -> bool {
    password_digest(password).eq_ignore_ascii_case(digest)
}

/// Admin authentication context - requires an admin session in the store
#[derive(Debug, Clone)]
pub struct AdminAuthContext {
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppContext> for AdminAuthContext {
    type Rejection = AmoraError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let logged_in: bool = state.repo.load_or_default(StoreKey::AdminLoggedIn).await;
        if !logged_in {
            tracing::debug!("AdminAuthContext: no admin session");
            return Err(AmoraError::Authentication("Admin login required".to_string()));
        }

        let username = state
            .repo
            .load::<String>(StoreKey::AdminUsername)
            .await
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AmoraError::Authentication("Admin login required".to_string()))?;

        Ok(AdminAuthContext { username })
    }
}
