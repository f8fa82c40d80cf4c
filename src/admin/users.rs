/// Admin user management
///
/// Users come from the sample catalog; admin decisions (status, premium,
/// verification) are layered on top as overrides under `adminUserStatus`.
use crate::{
    activity::{ActivityCategory, ActivityLog},
    catalog::{self, MockProfile},
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Banned => "banned",
        }
    }

    pub fn from_str(s: &str) -> AmoraResult<Self> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            "banned" => Ok(UserStatus::Banned),
            _ => Err(AmoraError::Validation(format!("Invalid user status: {}", s))),
        }
    }
}

/// Admin decisions recorded for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserOverride {
    pub status: Option<UserStatus>,
    pub premium: Option<bool>,
    pub verified: Option<bool>,
    pub reason: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

type Overrides = BTreeMap<String, UserOverride>;

/// A user as the admin console shows it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub location: String,
    pub joined: String,
    pub status: UserStatus,
    pub verified: bool,
    pub premium: bool,
    pub reason: Option<String>,
}

/// Filters for the users page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct UserDirectory {
    repo: Repository,
    activity: ActivityLog,
}

impl UserDirectory {
    pub fn new(repo: Repository, activity: ActivityLog) -> Self {
        Self { repo, activity }
    }

    pub async fn list(&self, query: &UserQuery) -> Vec<AdminUserView> {
        let overrides = self.overrides().await;
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        catalog::profiles()
            .iter()
            .map(|p| view(p, overrides.get(p.id)))
            .filter(|u| query.status.map_or(true, |s| u.status == s))
            .filter(|u| {
                needle.as_ref().map_or(true, |n| {
                    u.name.to_lowercase().contains(n)
                        || u.email.to_lowercase().contains(n)
                        || u.id == *n
                })
            })
            .collect()
    }

    pub async fn get(&self, user_id: &str) -> AmoraResult<AdminUserView> {
        let profile = find(user_id)?;
        let overrides = self.overrides().await;
        Ok(view(profile, overrides.get(user_id)))
    }

    pub async fn ban(&self, user_id: &str, reason: &str) -> AmoraResult<AdminUserView> {
        let reason = required_reason(reason)?;
        let user = self.set_status(user_id, UserStatus::Banned, Some(reason.clone())).await?;
        self.activity
            .record(
                "user_banned",
                &format!("User ID: {}", user_id),
                &format!("Banned {}: {}", user.name, reason),
                ActivityCategory::Moderation,
            )
            .await;
        Ok(user)
    }

    pub async fn suspend(&self, user_id: &str, reason: &str) -> AmoraResult<AdminUserView> {
        let reason = required_reason(reason)?;
        let user = self
            .set_status(user_id, UserStatus::Suspended, Some(reason.clone()))
            .await?;
        self.activity
            .record(
                "user_suspended",
                &format!("User ID: {}", user_id),
                &format!("Suspended {}: {}", user.name, reason),
                ActivityCategory::Moderation,
            )
            .await;
        Ok(user)
    }

    pub async fn reactivate(&self, user_id: &str) -> AmoraResult<AdminUserView> {
        let user = self.set_status(user_id, UserStatus::Active, None).await?;
        self.activity
            .record(
                "user_reactivated",
                &format!("User ID: {}", user_id),
                &format!("Reactivated {}", user.name),
                ActivityCategory::User,
            )
            .await;
        Ok(user)
    }

    /// Change a user's status without writing to the activity log
    pub(crate) async fn set_status(
        &self,
        user_id: &str,
        status: UserStatus,
        reason: Option<String>,
    ) -> AmoraResult<AdminUserView> {
        self.update(user_id, |o| {
            o.status = Some(status);
            o.reason = reason;
        })
        .await
    }

    pub(crate) async fn set_premium(&self, user_id: &str, premium: bool) -> AmoraResult<AdminUserView> {
        self.update(user_id, |o| o.premium = Some(premium)).await
    }

    pub(crate) async fn set_verified(&self, user_id: &str, verified: bool) -> AmoraResult<AdminUserView> {
        self.update(user_id, |o| o.verified = Some(verified)).await
    }

    async fn update<F>(&self, user_id: &str, apply: F) -> AmoraResult<AdminUserView>
    where
        F: FnOnce(&mut UserOverride),
    {
        let profile = find(user_id)?;
        let mut overrides = self.overrides().await;
        let entry = overrides.entry(user_id.to_string()).or_default();
        apply(entry);
        entry.updated_at = Some(Utc::now());
        let user = view(profile, Some(&*entry));

        self.repo.save(StoreKey::AdminUserStatus, &overrides).await?;
        info!(
            "user {} updated: status={} premium={} verified={}",
            user_id,
            user.status.as_str(),
            user.premium,
            user.verified
        );
        Ok(user)
    }

    async fn overrides(&self) -> Overrides {
        self.repo.load_or_default(StoreKey::AdminUserStatus).await
    }
}

fn find(user_id: &str) -> AmoraResult<&'static MockProfile> {
    catalog::find(user_id).ok_or_else(|| AmoraError::NotFound(format!("User {} not found", user_id)))
}

fn required_reason(reason: &str) -> AmoraResult<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AmoraError::Validation("reason: A reason is required".to_string()));
    }
    Ok(reason.to_string())
}

fn view(profile: &MockProfile, overrides: Option<&UserOverride>) -> AdminUserView {
    let o = overrides.cloned().unwrap_or_default();
    AdminUserView {
        id: profile.id.to_string(),
        name: profile.name.to_string(),
        email: profile.email.to_string(),
        age: profile.age,
        location: profile.location.to_string(),
        joined: profile.joined.to_string(),
        status: o.status.unwrap_or_default(),
        verified: o.verified.unwrap_or(profile.verified),
        premium: o.premium.unwrap_or(false),
        reason: o.reason,
    }
}
