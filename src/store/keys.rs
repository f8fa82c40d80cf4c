/// Store key names
use std::fmt;

/// Every key the service reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    OnboardingData,
    AuthData,
    ProfileSetup,
    DiscoveryLikes,
    DiscoveryPasses,
    DiscoveryMatches,
    DiscoveryFilters,
    UserSettings,
    BlockedUsers,
    ReportedUsers,
    ActivityLogs,
    IsPremium,
    AdminLoggedIn,
    AdminUsername,
    ChatMessages,
    AdminUserStatus,
    VerificationRequests,
    PromoCodes,
    Payments,
    PlatformSettings,
}

impl StoreKey {
    /// Keys cleared when a member logs out
    pub const MEMBER_SESSION: &'static [StoreKey] = &[
        StoreKey::OnboardingData,
        StoreKey::AuthData,
        StoreKey::ProfileSetup,
        StoreKey::DiscoveryLikes,
        StoreKey::DiscoveryPasses,
        StoreKey::DiscoveryMatches,
        StoreKey::DiscoveryFilters,
        StoreKey::UserSettings,
        StoreKey::BlockedUsers,
        StoreKey::ReportedUsers,
        StoreKey::IsPremium,
        StoreKey::ChatMessages,
    ];

    /// Keys cleared when the admin logs out
    pub const ADMIN_SESSION: &'static [StoreKey] =
        &[StoreKey::AdminLoggedIn, StoreKey::AdminUsername];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::OnboardingData => "onboardingData",
            StoreKey::AuthData => "authData",
            StoreKey::ProfileSetup => "profileSetup",
            StoreKey::DiscoveryLikes => "discoveryLikes",
            StoreKey::DiscoveryPasses => "discoveryPasses",
            StoreKey::DiscoveryMatches => "discoveryMatches",
            StoreKey::DiscoveryFilters => "discoveryFilters",
            StoreKey::UserSettings => "userSettings",
            StoreKey::BlockedUsers => "blockedUsers",
            StoreKey::ReportedUsers => "reportedUsers",
            StoreKey::ActivityLogs => "activityLogs",
            StoreKey::IsPremium => "isPremium",
            StoreKey::AdminLoggedIn => "adminLoggedIn",
            StoreKey::AdminUsername => "adminUsername",
            StoreKey::ChatMessages => "chatMessages",
            StoreKey::AdminUserStatus => "adminUserStatus",
            StoreKey::VerificationRequests => "verificationRequests",
            StoreKey::PromoCodes => "promoCodes",
            StoreKey::Payments => "payments",
            StoreKey::PlatformSettings => "platformSettings",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
