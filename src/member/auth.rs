/// Member sign-up, login and one-time-code verification
use crate::{
    auth::{password_digest, verify_password},
    config::ServerConfig,
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
    validation::{self, FieldErrors},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Stored credentials for the signed-up member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Email address or phone number
    pub identifier: String,
    pub password: String,
}

/// Where the member stands in the auth and onboarding flow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub authenticated: bool,
    pub verified: bool,
    pub name: Option<String>,
    pub onboarded: bool,
    pub profile_complete: bool,
    /// Next screen the client should show
    pub next_step: &'static str,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Repository,
    config: Arc<ServerConfig>,
}

impl AuthService {
    pub fn new(repo: Repository, config: Arc<ServerConfig>) -> Self {
        Self { repo, config }
    }

    /// Register the member; replaces any previous sign-up on this store
    pub async fn signup(&self, req: SignupRequest) -> AmoraResult<SessionInfo> {
        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "name", &req.name, "Name");
        errors.check(&req);
        validation::require_phone(&mut errors, "phone", &req.phone);
        errors.into_result()?;

        let data = AuthData {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            phone: validation::digits_only(&req.phone),
            password_hash: password_digest(&req.password),
            verified: false,
            created_at: Utc::now(),
        };
        self.repo.save(StoreKey::AuthData, &data).await?;

        info!("member signed up: {}", data.email);
        Ok(self.session().await)
    }

    /// Log in with email or phone
    pub async fn login(&self, req: LoginRequest) -> AmoraResult<SessionInfo> {
        let data: AuthData = self
            .repo
            .load(StoreKey::AuthData)
            .await
            .ok_or_else(|| AmoraError::Authentication("No account found".to_string()))?;

        let identifier = req.identifier.trim();
        let by_email = identifier.eq_ignore_ascii_case(&data.email);
        let by_phone = !identifier.contains('@')
            && validation::is_valid_phone(identifier)
            && validation::digits_only(identifier) == data.phone;

        if !(by_email || by_phone) || !verify_password(&req.password, &data.password_hash) {
            warn!("failed login attempt for {}", identifier);
            return Err(AmoraError::Authentication(
                "Invalid credentials".to_string(),
            ));
        }

        info!("member logged in: {}", data.email);
        Ok(self.session().await)
    }

    /// Check the one-time code sent after sign-up
    pub async fn verify_otp(&self, code: &str) -> AmoraResult<SessionInfo> {
        let code = code.trim();
        if !validation::is_valid_otp(code) {
            return Err(AmoraError::Validation(
                "code: Verification code must be 6 digits".to_string(),
            ));
        }

        let mut data: AuthData = self
            .repo
            .load(StoreKey::AuthData)
            .await
            .ok_or_else(|| AmoraError::NotFound("No pending sign-up".to_string()))?;

        if code != self.config.auth.mock_otp {
            return Err(AmoraError::Authentication(
                "Invalid verification code".to_string(),
            ));
        }

        data.verified = true;
        self.repo.save(StoreKey::AuthData, &data).await?;

        info!("member verified: {}", data.email);
        Ok(self.session().await)
    }

    /// Forget everything about the member session
    pub async fn logout(&self) -> AmoraResult<()> {
        self.repo.remove_all(StoreKey::MEMBER_SESSION).await?;
        info!("member logged out");
        Ok(())
    }

    pub async fn session(&self) -> SessionInfo {
        let auth: Option<AuthData> = self.repo.load(StoreKey::AuthData).await;
        let onboarded = self.repo.contains(StoreKey::OnboardingData).await;
        let profile_complete = self.repo.contains(StoreKey::ProfileSetup).await;

        let verified = auth.as_ref().map_or(false, |a| a.verified);
        let next_step = match (&auth, verified, onboarded, profile_complete) {
            (None, ..) => "login",
            (Some(_), false, ..) => "verify-otp",
            (Some(_), true, false, _) => "onboarding",
            (Some(_), true, true, false) => "profile-setup",
            (Some(_), true, true, true) => "home",
        };

        SessionInfo {
            authenticated: auth.is_some(),
            verified,
            name: auth.map(|a| a.name),
            onboarded,
            profile_complete,
            next_step,
        }
    }

    /// Stored credentials, if any
    pub async fn current(&self) -> Option<AuthData> {
        self.repo.load(StoreKey::AuthData).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> (AuthService, Repository) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        (
            AuthService::new(repo.clone(), Arc::new(ServerConfig::default())),
            repo,
        )
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            name: "Jordan".to_string(),
            email: "Jordan@Example.com".to_string(),
            phone: "(555) 010-2030".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_verify_login() {
        let (auth, _) = service();

        let session = auth.signup(signup_request()).await.unwrap();
        assert!(session.authenticated);
        assert!(!session.verified);
        assert_eq!(session.next_step, "verify-otp");

        assert!(auth.verify_otp("000000").await.is_err());
        let session = auth.verify_otp("123456").await.unwrap();
        assert!(session.verified);
        assert_eq!(session.next_step, "onboarding");

        let by_email = LoginRequest {
            identifier: "jordan@example.com".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(auth.login(by_email).await.is_ok());

        let by_phone = LoginRequest {
            identifier: "555-010-2030".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(auth.login(by_phone).await.is_ok());

        let wrong = LoginRequest {
            identifier: "jordan@example.com".to_string(),
            password: "wrong".to_string(),
        };
        assert!(matches!(
            auth.login(wrong).await,
            Err(AmoraError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn test_signup_field_errors() {
        let (auth, _) = service();
        let req = SignupRequest {
            name: " ".to_string(),
            email: "nope".to_string(),
            phone: "12345".to_string(),
            password: "short".to_string(),
        };

        let message = auth.signup(req).await.unwrap_err().to_string();
        assert!(message.contains("Name is required"));
        assert_eq!(message.matches("Name is required").count(), 1);
        assert!(message.contains("valid email"));
        assert!(message.contains("10 digits"));
        assert!(message.contains("at least 8"));
    }

    #[tokio::test]
    async fn test_login_ignores_digits_inside_other_text() {
        let (auth, _) = service();
        auth.signup(signup_request()).await.unwrap();

        for identifier in ["x5550102030@y", "call me at 555 010 2030 ok?1", "5550102030"] {
            let req = LoginRequest {
                identifier: identifier.to_string(),
                password: "correct horse".to_string(),
            };
            let result = auth.login(req).await;
            if identifier == "5550102030" {
                assert!(result.is_ok());
            } else {
                assert!(
                    matches!(result, Err(AmoraError::Authentication(_))),
                    "{} should not log in",
                    identifier
                );
            }
        }
    }

    #[tokio::test]
    async fn test_otp_format() {
        let (auth, _) = service();
        auth.signup(signup_request()).await.unwrap();
        assert!(matches!(
            auth.verify_otp("12345").await,
            Err(AmoraError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_member_keys_only() {
        let (auth, repo) = service();
        auth.signup(signup_request()).await.unwrap();
        repo.save(StoreKey::IsPremium, &true).await.unwrap();
        repo.save(StoreKey::AdminUsername, "admin").await.unwrap();

        auth.logout().await.unwrap();

        for key in StoreKey::MEMBER_SESSION {
            assert!(!repo.contains(*key).await, "{} should be cleared", key);
        }
        assert!(repo.contains(StoreKey::AdminUsername).await);
        assert_eq!(auth.session().await.next_step, "login");

        let profile = crate::member::profile::ProfileService::new(repo.clone());
        assert!(matches!(
            profile.view().await,
            crate::member::profile::ProfileView::Empty
        ));
    }
}
