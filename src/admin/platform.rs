/// Platform-wide settings edited from the admin console
use crate::{
    activity::{ActivityCategory, ActivityLog},
    error::AmoraResult,
    store::{Repository, StoreKey},
    validation::{self, FieldErrors, MINIMUM_AGE},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSettings {
    pub maintenance_mode: bool,
    pub allow_signups: bool,
    pub require_photo_verification: bool,
    #[validate(range(min = 18, max = 99, message = "Minimum age must be between 18 and 99"))]
    pub minimum_age: u32,
    #[validate(range(min = 1, max = 500, message = "Max distance must be between 1 and 500 km"))]
    pub max_distance_km: u32,
    #[validate(range(min = 1, max = 1000, message = "Daily like limit must be between 1 and 1000"))]
    pub daily_like_limit: u32,
    pub support_email: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            allow_signups: true,
            require_photo_verification: false,
            minimum_age: MINIMUM_AGE,
            max_distance_km: 100,
            daily_like_limit: 100,
            support_email: "support@amora.app".to_string(),
        }
    }
}

impl PlatformSettings {
    /// Names of the fields that differ from `other`
    fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.maintenance_mode != other.maintenance_mode {
            changed.push("maintenanceMode");
        }
        if self.allow_signups != other.allow_signups {
            changed.push("allowSignups");
        }
        if self.require_photo_verification != other.require_photo_verification {
            changed.push("requirePhotoVerification");
        }
        if self.minimum_age != other.minimum_age {
            changed.push("minimumAge");
        }
        if self.max_distance_km != other.max_distance_km {
            changed.push("maxDistanceKm");
        }
        if self.daily_like_limit != other.daily_like_limit {
            changed.push("dailyLikeLimit");
        }
        if self.support_email != other.support_email {
            changed.push("supportEmail");
        }
        changed
    }
}

#[derive(Clone)]
pub struct PlatformConfig {
    repo: Repository,
    activity: ActivityLog,
}

impl PlatformConfig {
    pub fn new(repo: Repository, activity: ActivityLog) -> Self {
        Self { repo, activity }
    }

    pub async fn get(&self) -> PlatformSettings {
        self.repo.load_or_default(StoreKey::PlatformSettings).await
    }

    pub async fn update(&self, mut settings: PlatformSettings) -> AmoraResult<PlatformSettings> {
        settings.support_email = settings.support_email.trim().to_string();

        let mut errors = FieldErrors::new();
        errors.check(&settings);
        if !validation::is_valid_email(&settings.support_email) {
            errors.push("supportEmail", "Enter a valid email address");
        }
        errors.into_result()?;

        let previous = self.get().await;
        let changed = settings.changed_fields(&previous);
        if changed.is_empty() {
            return Ok(previous);
        }

        self.repo.save(StoreKey::PlatformSettings, &settings).await?;
        self.activity
            .record(
                "platform_settings_updated",
                "Platform Settings",
                &format!("Updated {}", changed.join(", ")),
                ActivityCategory::Settings,
            )
            .await;

        info!("platform settings updated: {:?}", changed);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogFilter;
    use crate::error::AmoraError;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn platform() -> (PlatformConfig, ActivityLog) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let activity = ActivityLog::new(repo.clone());
        (PlatformConfig::new(repo, activity.clone()), activity)
    }

    #[tokio::test]
    async fn test_update_records_changed_fields() {
        let (platform, activity) = platform();
        let settings = PlatformSettings {
            maintenance_mode: true,
            daily_like_limit: 50,
            ..platform.get().await
        };
        let saved = platform.update(settings.clone()).await.unwrap();
        assert_eq!(saved, settings);
        assert_eq!(platform.get().await, settings);

        let entries = activity
            .list(&LogFilter::category(ActivityCategory::Settings))
            .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Updated maintenanceMode, dailyLikeLimit");
    }

    #[tokio::test]
    async fn test_unchanged_update_is_not_logged() {
        let (platform, activity) = platform();
        platform.update(PlatformSettings::default()).await.unwrap();
        assert!(activity.list(&LogFilter::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_settings_rejected() {
        let (platform, _) = platform();
        let settings = PlatformSettings {
            minimum_age: 16,
            support_email: "nope".to_string(),
            ..PlatformSettings::default()
        };
        match platform.update(settings).await {
            Err(AmoraError::Validation(message)) => {
                assert!(message.contains("minimum_age"));
                assert!(message.contains("supportEmail"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
