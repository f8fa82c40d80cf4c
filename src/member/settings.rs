/// Member settings
///
/// Loading the settings page resets every boolean toggle to `false`; only the
/// profile visibility survives a reload. Toggle writes start from that reset
/// view and overwrite the stored record wholesale.
use super::safety::BlockedUser;
use crate::{
    catalog,
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub show_online_status: bool,
    pub show_distance: bool,
    pub show_age: bool,
    pub push_notifications: bool,
    pub email_notifications: bool,
    pub match_notifications: bool,
    pub message_notifications: bool,
    pub read_receipts: bool,
    pub profile_visibility: Visibility,
}

/// Boolean settings that can be flipped individually
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    ShowOnlineStatus,
    ShowDistance,
    ShowAge,
    PushNotifications,
    EmailNotifications,
    MatchNotifications,
    MessageNotifications,
    ReadReceipts,
}

impl SettingToggle {
    pub fn from_str(s: &str) -> AmoraResult<Self> {
        match s {
            "showOnlineStatus" => Ok(SettingToggle::ShowOnlineStatus),
            "showDistance" => Ok(SettingToggle::ShowDistance),
            "showAge" => Ok(SettingToggle::ShowAge),
            "pushNotifications" => Ok(SettingToggle::PushNotifications),
            "emailNotifications" => Ok(SettingToggle::EmailNotifications),
            "matchNotifications" => Ok(SettingToggle::MatchNotifications),
            "messageNotifications" => Ok(SettingToggle::MessageNotifications),
            "readReceipts" => Ok(SettingToggle::ReadReceipts),
            _ => Err(AmoraError::NotFound(format!("Unknown setting: {}", s))),
        }
    }
}

impl UserSettings {
    fn slot(&mut self, toggle: SettingToggle) -> &mut bool {
        match toggle {
            SettingToggle::ShowOnlineStatus => &mut self.show_online_status,
            SettingToggle::ShowDistance => &mut self.show_distance,
            SettingToggle::ShowAge => &mut self.show_age,
            SettingToggle::PushNotifications => &mut self.push_notifications,
            SettingToggle::EmailNotifications => &mut self.email_notifications,
            SettingToggle::MatchNotifications => &mut self.match_notifications,
            SettingToggle::MessageNotifications => &mut self.message_notifications,
            SettingToggle::ReadReceipts => &mut self.read_receipts,
        }
    }

    pub fn get(&self, toggle: SettingToggle) -> bool {
        match toggle {
            SettingToggle::ShowOnlineStatus => self.show_online_status,
            SettingToggle::ShowDistance => self.show_distance,
            SettingToggle::ShowAge => self.show_age,
            SettingToggle::PushNotifications => self.push_notifications,
            SettingToggle::EmailNotifications => self.email_notifications,
            SettingToggle::MatchNotifications => self.match_notifications,
            SettingToggle::MessageNotifications => self.message_notifications,
            SettingToggle::ReadReceipts => self.read_receipts,
        }
    }

    /// Same record with every boolean cleared
    fn with_toggles_reset(&self) -> Self {
        Self {
            profile_visibility: self.profile_visibility,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    repo: Repository,
}

impl SettingsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Settings as the page shows them on load
    pub async fn load(&self) -> UserSettings {
        self.stored().await.with_toggles_reset()
    }

    /// Settings exactly as last written
    pub async fn stored(&self) -> UserSettings {
        self.repo.load_or_default(StoreKey::UserSettings).await
    }

    pub async fn set_toggle(&self, toggle: SettingToggle, value: bool) -> AmoraResult<UserSettings> {
        let mut settings = self.load().await;
        *settings.slot(toggle) = value;
        self.repo.save(StoreKey::UserSettings, &settings).await?;
        info!("setting {:?} set to {}", toggle, value);
        Ok(settings)
    }

    pub async fn set_visibility(&self, visibility: Visibility) -> AmoraResult<UserSettings> {
        let mut settings = self.load().await;
        settings.profile_visibility = visibility;
        self.repo.save(StoreKey::UserSettings, &settings).await?;
        info!("profile visibility set to {:?}", visibility);
        Ok(settings)
    }

    pub async fn blocked(&self) -> Vec<BlockedUser> {
        let ids: Vec<String> = self.repo.load_or_default(StoreKey::BlockedUsers).await;
        ids.into_iter()
            .map(|id| BlockedUser {
                name: catalog::display_name(&id),
                id,
            })
            .collect()
    }

    /// Remove one id from the block list; returns whether it was blocked
    pub async fn unblock(&self, user_id: &str) -> AmoraResult<bool> {
        let removed = self.repo.remove_id(StoreKey::BlockedUsers, user_id).await?;
        if removed {
            info!("unblocked {}", user_id);
        }
        Ok(removed)
    }

    /// Wipe every stored document
    pub async fn delete_account(&self) -> AmoraResult<()> {
        self.repo.clear().await?;
        warn!("account deleted, store cleared");
        Ok(())
    }
}
