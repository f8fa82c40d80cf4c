/// Photo verification review queue
use super::users::UserDirectory;
use crate::{
    activity::{ActivityCategory, ActivityLog},
    catalog,
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub selfie: String,
    pub submitted_at: DateTime<Utc>,
    pub status: VerificationStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct VerificationQueue {
    repo: Repository,
    users: UserDirectory,
    activity: ActivityLog,
}

impl VerificationQueue {
    pub fn new(repo: Repository, users: UserDirectory, activity: ActivityLog) -> Self {
        Self {
            repo,
            users,
            activity,
        }
    }

    /// Every request, seeded from unverified sample members on first read
    pub async fn all(&self) -> Vec<VerificationRequest> {
        self.repo
            .load::<Vec<VerificationRequest>>(StoreKey::VerificationRequests)
            .await
            .unwrap_or_else(seed_requests)
    }

    pub async fn pending(&self) -> Vec<VerificationRequest> {
        self.all()
            .await
            .into_iter()
            .filter(|r| r.status == VerificationStatus::Pending)
            .collect()
    }

    pub async fn approve(&self, request_id: &str, admin: &str) -> AmoraResult<VerificationRequest> {
        let request = self
            .review(request_id, admin, VerificationStatus::Approved, None)
            .await?;
        self.users.set_verified(&request.user_id, true).await?;

        self.activity
            .record(
                "verification_approved",
                &format!("User ID: {}", request.user_id),
                &format!("Approved photo verification for {}", request.user_name),
                ActivityCategory::Verification,
            )
            .await;
        Ok(request)
    }

    pub async fn reject(
        &self,
        request_id: &str,
        admin: &str,
        reason: &str,
    ) -> AmoraResult<VerificationRequest> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AmoraError::Validation(
                "reason: A rejection reason is required".to_string(),
            ));
        }

        let request = self
            .review(
                request_id,
                admin,
                VerificationStatus::Rejected,
                Some(reason.to_string()),
            )
            .await?;

        self.activity
            .record(
                "verification_rejected",
                &format!("User ID: {}", request.user_id),
                &format!(
                    "Rejected photo verification for {}: {}",
                    request.user_name, reason
                ),
                ActivityCategory::Verification,
            )
            .await;
        Ok(request)
    }

    async fn review(
        &self,
        request_id: &str,
        admin: &str,
        status: VerificationStatus,
        reason: Option<String>,
    ) -> AmoraResult<VerificationRequest> {
        let mut requests = self.all().await;
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| {
                AmoraError::NotFound(format!("Verification request {} not found", request_id))
            })?;

        if request.status != VerificationStatus::Pending {
            return Err(AmoraError::Conflict(format!(
                "Verification request {} was already reviewed",
                request_id
            )));
        }

        request.status = status;
        request.reason = reason;
        request.reviewed_by = Some(admin.to_string());
        request.reviewed_at = Some(Utc::now());
        let reviewed = request.clone();

        self.repo.save(StoreKey::VerificationRequests, &requests).await?;
        info!("verification {} marked {:?} by {}", request_id, status, admin);
        Ok(reviewed)
    }
}

fn seed_requests() -> Vec<VerificationRequest> {
    let submitted = Utc
        .with_ymd_and_hms(2024, 3, 20, 18, 0, 0)
        .single()
        .unwrap_or_default();
    catalog::profiles()
        .iter()
        .filter(|p| !p.verified)
        .enumerate()
        .map(|(i, p)| VerificationRequest {
            id: format!("ver_{}", p.id),
            user_id: p.id.to_string(),
            user_name: p.name.to_string(),
            selfie: p.photos.first().copied().unwrap_or_default().to_string(),
            submitted_at: submitted - Duration::hours(3 * (i as i64 + 1)),
            status: VerificationStatus::Pending,
            reason: None,
            reviewed_by: None,
            reviewed_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogFilter;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn queue() -> (VerificationQueue, UserDirectory, ActivityLog) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let activity = ActivityLog::new(repo.clone());
        let users = UserDirectory::new(repo.clone(), activity.clone());
        (
            VerificationQueue::new(repo, users.clone(), activity.clone()),
            users,
            activity,
        )
    }

    #[tokio::test]
    async fn test_seeded_from_unverified_members() {
        let (queue, _, _) = queue();
        let pending = queue.pending().await;
        assert!(!pending.is_empty());
        for request in &pending {
            let profile = catalog::find(&request.user_id).unwrap();
            assert!(!profile.verified);
        }
    }

    #[tokio::test]
    async fn test_seeded_queue_is_stable_between_reads() {
        let (queue, _, _) = queue();
        let first = queue.all().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = queue.all().await;

        let stamps = |requests: &[VerificationRequest]| {
            requests.iter().map(|r| r.submitted_at).collect::<Vec<_>>()
        };
        assert_eq!(stamps(&first), stamps(&second));
        assert!(first.windows(2).all(|w| w[0].submitted_at > w[1].submitted_at));
    }

    #[tokio::test]
    async fn test_approve_marks_user_verified() {
        let (queue, users, activity) = queue();
        let approved = queue.approve("ver_3", "admin").await.unwrap();
        assert_eq!(approved.status, VerificationStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some("admin"));

        assert!(users.get("3").await.unwrap().verified);
        assert!(queue.pending().await.iter().all(|r| r.id != "ver_3"));

        let entries = activity
            .list(&LogFilter::category(ActivityCategory::Verification))
            .await;
        assert_eq!(entries[0].action, "verification_approved");

        assert!(matches!(
            queue.approve("ver_3", "admin").await,
            Err(AmoraError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let (queue, users, _) = queue();
        assert!(matches!(
            queue.reject("ver_5", "admin", " ").await,
            Err(AmoraError::Validation(_))
        ));

        let rejected = queue.reject("ver_5", "admin", "Blurry selfie").await.unwrap();
        assert_eq!(rejected.reason.as_deref(), Some("Blurry selfie"));
        assert!(!users.get("5").await.unwrap().verified);

        assert!(matches!(
            queue.reject("ver_missing", "admin", "x").await,
            Err(AmoraError::NotFound(_))
        ));
    }
}
