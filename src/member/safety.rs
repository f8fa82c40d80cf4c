/// Blocking, reporting and safety guidance
use crate::{
    catalog,
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub const MAX_REPORT_DETAILS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    FakeProfile,
    Inappropriate,
    Harassment,
    Underage,
    Other,
}

impl ReportReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::Spam => "Spam",
            ReportReason::FakeProfile => "Fake profile",
            ReportReason::Inappropriate => "Inappropriate content",
            ReportReason::Harassment => "Harassment",
            ReportReason::Underage => "Underage",
            ReportReason::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Resolved,
    Dismissed,
}

/// A member report, reviewed from the admin moderation queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: String,
    pub user_id: String,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub status: ReportStatus,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockedUser {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetyTip {
    pub title: &'static str,
    pub body: &'static str,
}

const TIPS: &[SafetyTip] = &[
    SafetyTip {
        title: "Keep personal details private",
        body: "Don't share your address, workplace or financial information with someone you haven't met.",
    },
    SafetyTip {
        title: "Meet in public",
        body: "For first dates choose a busy public place and arrange your own transport.",
    },
    SafetyTip {
        title: "Tell a friend",
        body: "Let someone you trust know where you're going and who you're meeting.",
    },
    SafetyTip {
        title: "Never send money",
        body: "Report anyone who asks for money, gift cards or crypto, whatever the story.",
    },
    SafetyTip {
        title: "Trust your instincts",
        body: "If something feels off, leave. You can block and report at any time.",
    },
];

#[derive(Clone)]
pub struct SafetyService {
    repo: Repository,
}

impl SafetyService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn tips(&self) -> &'static [SafetyTip] {
        TIPS
    }

    pub async fn block(&self, user_id: &str) -> AmoraResult<()> {
        if self.repo.push_unique_id(StoreKey::BlockedUsers, user_id).await? {
            info!("blocked {}", user_id);
        }
        Ok(())
    }

    /// File a report against a member; reporting also blocks them
    pub async fn report(
        &self,
        user_id: &str,
        reason: ReportReason,
        details: Option<String>,
    ) -> AmoraResult<ReportRecord> {
        let details = details.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
        if let Some(d) = &details {
            if d.chars().count() > MAX_REPORT_DETAILS {
                return Err(AmoraError::Validation(format!(
                    "details: Details must be {} characters or fewer",
                    MAX_REPORT_DETAILS
                )));
            }
        }
        if reason == ReportReason::Other && details.is_none() {
            return Err(AmoraError::Validation(
                "details: Please describe the problem".to_string(),
            ));
        }

        let report = ReportRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            reason,
            details,
            reported_at: Utc::now(),
            status: ReportStatus::Open,
            resolution: None,
            reviewed_by: None,
            reviewed_at: None,
        };

        let mut reports = self.reports().await;
        reports.push(report.clone());
        self.repo.save(StoreKey::ReportedUsers, &reports).await?;
        self.block(user_id).await?;

        info!(
            "reported {} ({}) for {}",
            catalog::display_name(user_id),
            user_id,
            reason.label()
        );
        Ok(report)
    }

    pub async fn reports(&self) -> Vec<ReportRecord> {
        self.repo.load_or_default(StoreKey::ReportedUsers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn service() -> (SafetyService, Repository) {
        let repo = Repository::new(Arc::new(crate::store::MemoryStore::new()));
        (SafetyService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_report_also_blocks() {
        let (safety, repo) = service();
        let report = safety
            .report("3", ReportReason::FakeProfile, Some("  stolen photos ".to_string()))
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Open);
        assert_eq!(report.details.as_deref(), Some("stolen photos"));

        let blocked: Vec<String> = repo.load_or_default(StoreKey::BlockedUsers).await;
        assert_eq!(blocked, vec!["3"]);
        assert_eq!(safety.reports().await.len(), 1);
    }

    #[tokio::test]
    async fn test_other_requires_details() {
        let (safety, _) = service();
        assert!(safety.report("3", ReportReason::Other, None).await.is_err());
        assert!(safety
            .report("3", ReportReason::Other, Some("asked for money".to_string()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_block_is_idempotent() {
        let (safety, repo) = service();
        safety.block("5").await.unwrap();
        safety.block("5").await.unwrap();
        let blocked: Vec<String> = repo.load_or_default(StoreKey::BlockedUsers).await;
        assert_eq!(blocked.len(), 1);
    }

    #[test]
    fn test_tips_present() {
        let (safety, _) = service();
        assert!(!safety.tips().is_empty());
    }
}
