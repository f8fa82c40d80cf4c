/// Member-facing services
///
/// One service per screen of the member app. Each reads the documents it
/// needs from the shared repository and writes back on user action; none
/// holds state of its own.

pub mod auth;
pub mod chats;
pub mod discovery;
pub mod liked_you;
pub mod onboarding;
pub mod premium;
pub mod profile;
pub mod safety;
pub mod settings;

pub use auth::{AuthData, AuthService, LoginRequest, SessionInfo, SignupRequest};
pub use chats::{ChatMessage, ChatService, ChatSummary};
pub use discovery::{DiscoveryFilters, DiscoveryService, LikeOutcome, MatchRecord, MatchView};
pub use liked_you::{LikedYouProfile, LikedYouService, LikedYouView};
pub use onboarding::{OnboardingData, OnboardingService, ProfileSetup};
pub use premium::{PremiumService, PremiumStatus};
pub use profile::{EditProfileForm, MemberProfile, ProfileService, ProfileView};
pub use safety::{BlockedUser, ReportReason, ReportRecord, ReportStatus, SafetyService, SafetyTip};
pub use settings::{SettingToggle, SettingsService, UserSettings, Visibility};
