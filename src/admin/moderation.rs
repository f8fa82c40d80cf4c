/// Report moderation queue
///
/// Reports are filed by members under `reportedUsers`; the admin side reads
/// the same document and writes the outcome back onto each record.
use super::users::{UserDirectory, UserStatus};
use crate::{
    activity::{ActivityCategory, ActivityLog},
    catalog,
    error::{AmoraError, AmoraResult},
    member::{ReportRecord, ReportStatus},
    store::{Repository, StoreKey},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome chosen for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Close without action
    Dismiss,
    /// Warn the reported member
    Warn,
    /// Ban the reported member
    Ban,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Dismiss => "dismiss",
            ModerationAction::Warn => "warn",
            ModerationAction::Ban => "ban",
        }
    }

    pub fn from_str(s: &str) -> AmoraResult<Self> {
        match s.to_lowercase().as_str() {
            "dismiss" => Ok(ModerationAction::Dismiss),
            "warn" => Ok(ModerationAction::Warn),
            "ban" => Ok(ModerationAction::Ban),
            _ => Err(AmoraError::Validation(format!("Invalid moderation action: {}", s))),
        }
    }
}

/// A report as shown in the moderation queue
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationItem {
    #[serde(flatten)]
    pub report: ReportRecord,
    pub user_name: String,
    pub reason_label: &'static str,
}

#[derive(Clone)]
pub struct ModerationQueue {
    repo: Repository,
    users: UserDirectory,
    activity: ActivityLog,
}

impl ModerationQueue {
    pub fn new(repo: Repository, users: UserDirectory, activity: ActivityLog) -> Self {
        Self {
            repo,
            users,
            activity,
        }
    }

    /// Reports, open ones first, newest first within each group
    pub async fn list(&self, open_only: bool) -> Vec<ModerationItem> {
        let mut reports = self.reports().await;
        reports.retain(|r| !open_only || r.status == ReportStatus::Open);
        reports.sort_by(|a, b| {
            let open = |r: &ReportRecord| r.status != ReportStatus::Open;
            open(a)
                .cmp(&open(b))
                .then_with(|| b.reported_at.cmp(&a.reported_at))
        });

        reports
            .into_iter()
            .map(|report| ModerationItem {
                user_name: catalog::display_name(&report.user_id),
                reason_label: report.reason.label(),
                report,
            })
            .collect()
    }

    pub async fn open_count(&self) -> usize {
        self.reports()
            .await
            .iter()
            .filter(|r| r.status == ReportStatus::Open)
            .count()
    }

    pub async fn resolve(
        &self,
        report_id: &str,
        action: ModerationAction,
        note: Option<String>,
        admin: &str,
    ) -> AmoraResult<ReportRecord> {
        let mut reports = self.reports().await;
        let report = reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(|| AmoraError::NotFound(format!("Report {} not found", report_id)))?;

        if report.status != ReportStatus::Open {
            return Err(AmoraError::Conflict(format!(
                "Report {} is already closed",
                report_id
            )));
        }

        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        report.status = match action {
            ModerationAction::Dismiss => ReportStatus::Dismissed,
            ModerationAction::Warn | ModerationAction::Ban => ReportStatus::Resolved,
        };
        report.resolution = Some(match &note {
            Some(n) => format!("{}: {}", action.as_str(), n),
            None => action.as_str().to_string(),
        });
        report.reviewed_by = Some(admin.to_string());
        report.reviewed_at = Some(Utc::now());
        let resolved = report.clone();

        self.repo.save(StoreKey::ReportedUsers, &reports).await?;

        // Reports may name users outside the catalog; only known users get a status
        if action == ModerationAction::Ban && catalog::find(&resolved.user_id).is_some() {
            let reason = note
                .clone()
                .unwrap_or_else(|| resolved.reason.label().to_string());
            self.users
                .set_status(&resolved.user_id, UserStatus::Banned, Some(reason))
                .await?;
        }

        let name = catalog::display_name(&resolved.user_id);
        let description = match action {
            ModerationAction::Dismiss => format!("Dismissed report against {}", name),
            ModerationAction::Warn => format!("Warned {} ({})", name, resolved.reason.label()),
            ModerationAction::Ban => format!("Banned {} ({})", name, resolved.reason.label()),
        };
        self.activity
            .record(
                &format!("report_{}", action.as_str()),
                &format!("Report ID: {}", report_id),
                &description,
                ActivityCategory::Moderation,
            )
            .await;

        info!("report {} closed with {}", report_id, action.as_str());
        Ok(resolved)
    }

    async fn reports(&self) -> Vec<ReportRecord> {
        self.repo.load_or_default(StoreKey::ReportedUsers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogFilter;
    use crate::member::{ReportReason, SafetyService};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    struct Fixture {
        queue: ModerationQueue,
        users: UserDirectory,
        safety: SafetyService,
        activity: ActivityLog,
    }

    fn fixture() -> Fixture {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let activity = ActivityLog::new(repo.clone());
        let users = UserDirectory::new(repo.clone(), activity.clone());
        Fixture {
            queue: ModerationQueue::new(repo.clone(), users.clone(), activity.clone()),
            users,
            safety: SafetyService::new(repo),
            activity,
        }
    }

    #[tokio::test]
    async fn test_member_reports_reach_queue() {
        let f = fixture();
        f.safety.report("4", ReportReason::Spam, None).await.unwrap();

        let items = f.queue.list(true).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].user_name, "James");
        assert_eq!(items[0].reason_label, "Spam");
        assert_eq!(f.queue.open_count().await, 1);
    }

    #[tokio::test]
    async fn test_ban_resolution_bans_user() {
        let f = fixture();
        let report = f
            .safety
            .report("7", ReportReason::Harassment, None)
            .await
            .unwrap();

        let resolved = f
            .queue
            .resolve(&report.id, ModerationAction::Ban, Some("Repeated abuse".into()), "admin")
            .await
            .unwrap();
        assert_eq!(resolved.status, ReportStatus::Resolved);
        assert_eq!(resolved.resolution.as_deref(), Some("ban: Repeated abuse"));

        assert_eq!(f.users.get("7").await.unwrap().status, UserStatus::Banned);
        assert_eq!(f.queue.open_count().await, 0);

        let entries = f
            .activity
            .list(&LogFilter::category(ActivityCategory::Moderation))
            .await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "report_ban");

        assert!(matches!(
            f.queue
                .resolve(&report.id, ModerationAction::Warn, None, "admin")
                .await,
            Err(AmoraError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_dismiss_leaves_user_active() {
        let f = fixture();
        let report = f.safety.report("ghost", ReportReason::Spam, None).await.unwrap();
        let dismissed = f
            .queue
            .resolve(&report.id, ModerationAction::Dismiss, None, "admin")
            .await
            .unwrap();
        assert_eq!(dismissed.status, ReportStatus::Dismissed);
        assert_eq!(f.queue.list(false).await[0].user_name, catalog::UNKNOWN_USER);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(ModerationAction::from_str("BAN").unwrap(), ModerationAction::Ban);
        assert!(ModerationAction::from_str("takedown").is_err());
    }
}
