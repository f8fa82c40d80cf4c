/// Admin console sign-in
use crate::{
    activity::{ActivityCategory, ActivityLog},
    auth::verify_password,
    config::ServerConfig,
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionInfo {
    pub logged_in: bool,
    pub username: Option<String>,
}

#[derive(Clone)]
pub struct AdminSession {
    repo: Repository,
    config: Arc<ServerConfig>,
    activity: ActivityLog,
}

impl AdminSession {
    pub fn new(repo: Repository, config: Arc<ServerConfig>, activity: ActivityLog) -> Self {
        Self {
            repo,
            config,
            activity,
        }
    }

    pub async fn login(&self, req: AdminLoginRequest) -> AmoraResult<AdminSessionInfo> {
        let username = req.username.trim();
        let admin = &self.config.admin;

        if username != admin.username || !verify_password(&req.password, &admin.password_sha256) {
            warn!("failed admin login for {}", username);
            return Err(AmoraError::Authentication(
                "Invalid admin credentials".to_string(),
            ));
        }

        self.repo.save(StoreKey::AdminLoggedIn, &true).await?;
        self.repo.save(StoreKey::AdminUsername, username).await?;

        self.activity
            .record(
                "admin_login",
                username,
                &format!("{} signed in to the admin console", username),
                ActivityCategory::Settings,
            )
            .await;

        info!("admin {} logged in", username);
        Ok(AdminSessionInfo {
            logged_in: true,
            username: Some(username.to_string()),
        })
    }

    pub async fn logout(&self) -> AmoraResult<()> {
        self.repo.remove_all(StoreKey::ADMIN_SESSION).await?;
        info!("admin logged out");
        Ok(())
    }

    pub async fn current(&self) -> AdminSessionInfo {
        let logged_in: bool = self.repo.load_or_default(StoreKey::AdminLoggedIn).await;
        let username = if logged_in {
            self.repo.load::<String>(StoreKey::AdminUsername).await
        } else {
            None
        };
        AdminSessionInfo {
            logged_in,
            username,
        }
    }
}
