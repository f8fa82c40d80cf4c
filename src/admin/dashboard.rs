/// Admin dashboard summary
use super::{
    moderation::ModerationQueue,
    users::{UserDirectory, UserQuery, UserStatus},
    verification::VerificationQueue,
};
use crate::{
    activity::{ActivityLog, ActivityLogEntry},
    billing::PaymentLedger,
};
use serde::Serialize;

/// Entries shown in the dashboard's recent activity panel
pub const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub suspended_users: usize,
    pub banned_users: usize,
    pub verified_users: usize,
    pub premium_users: usize,
    pub pending_verifications: usize,
    pub open_reports: usize,
    pub revenue_cents: u64,
    pub recent_activity: Vec<ActivityLogEntry>,
}

#[derive(Clone)]
pub struct Dashboard {
    users: UserDirectory,
    verification: VerificationQueue,
    moderation: ModerationQueue,
    ledger: PaymentLedger,
    activity: ActivityLog,
}

impl Dashboard {
    pub fn new(
        users: UserDirectory,
        verification: VerificationQueue,
        moderation: ModerationQueue,
        ledger: PaymentLedger,
        activity: ActivityLog,
    ) -> Self {
        Self {
            users,
            verification,
            moderation,
            ledger,
            activity,
        }
    }

    pub async fn stats(&self) -> DashboardStats {
        let users = self.users.list(&UserQuery::default()).await;
        let with_status = |s: UserStatus| users.iter().filter(|u| u.status == s).count();

        DashboardStats {
            total_users: users.len(),
            active_users: with_status(UserStatus::Active),
            suspended_users: with_status(UserStatus::Suspended),
            banned_users: with_status(UserStatus::Banned),
            verified_users: users.iter().filter(|u| u.verified).count(),
            premium_users: users.iter().filter(|u| u.premium).count(),
            pending_verifications: self.verification.pending().await.len(),
            open_reports: self.moderation.open_count().await,
            revenue_cents: self.ledger.revenue_cents().await,
            recent_activity: self.activity.recent(RECENT_ACTIVITY).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Repository};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stats_reflect_admin_actions() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let activity = ActivityLog::new(repo.clone());
        let users = UserDirectory::new(repo.clone(), activity.clone());
        let verification = VerificationQueue::new(repo.clone(), users.clone(), activity.clone());
        let moderation = ModerationQueue::new(repo.clone(), users.clone(), activity.clone());
        let dashboard = Dashboard::new(
            users.clone(),
            verification.clone(),
            moderation,
            PaymentLedger::new(repo),
            activity,
        );

        let before = dashboard.stats().await;
        assert_eq!(before.total_users, 10);
        assert_eq!(before.verified_users, 6);
        assert_eq!(before.pending_verifications, 4);
        assert_eq!(before.revenue_cents, 7998);
        assert!(before.recent_activity.is_empty());

        for id in ["1", "2", "3", "4", "5", "6"] {
            users.ban(id, "Spam").await.unwrap();
        }
        verification.approve("ver_10", "admin").await.unwrap();

        let after = dashboard.stats().await;
        assert_eq!(after.banned_users, 6);
        assert_eq!(after.active_users, 4);
        assert_eq!(after.verified_users, 7);
        assert_eq!(after.pending_verifications, 3);
        assert_eq!(after.recent_activity.len(), RECENT_ACTIVITY);
        assert_eq!(after.recent_activity[0].action, "verification_approved");
    }
}
