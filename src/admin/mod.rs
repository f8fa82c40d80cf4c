/// Admin console services
///
/// User management, verification review, report moderation, premium
/// administration and platform settings. Every mutating action is recorded
/// in the activity log.

pub mod dashboard;
pub mod moderation;
pub mod platform;
pub mod premium;
pub mod session;
pub mod users;
pub mod verification;

pub use dashboard::{Dashboard, DashboardStats};
pub use moderation::{ModerationAction, ModerationItem, ModerationQueue};
pub use platform::{PlatformConfig, PlatformSettings};
pub use premium::{CreatePromoCode, PremiumAdmin, PromoCode};
pub use session::{AdminLoginRequest, AdminSession, AdminSessionInfo};
pub use users::{AdminUserView, UserDirectory, UserQuery, UserStatus};
pub use verification::{VerificationQueue, VerificationRequest, VerificationStatus};
