/// Admin activity log
///
/// Append-only record of administrative actions, stored newest-first under
/// the `activityLogs` key. Admin services receive an `ActivityLog` handle and
/// call `record` after each action; the activity log page reads it back
/// through `list`.
use crate::{
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Actor name used when no admin is signed in
pub const FALLBACK_ADMIN: &str = "Admin";

/// Activity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    User,
    Premium,
    Moderation,
    Settings,
    Verification,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 5] = [
        ActivityCategory::User,
        ActivityCategory::Premium,
        ActivityCategory::Moderation,
        ActivityCategory::Settings,
        ActivityCategory::Verification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::User => "user",
            ActivityCategory::Premium => "premium",
            ActivityCategory::Moderation => "moderation",
            ActivityCategory::Settings => "settings",
            ActivityCategory::Verification => "verification",
        }
    }

    pub fn from_str(s: &str) -> AmoraResult<Self> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ActivityCategory::User),
            "premium" => Ok(ActivityCategory::Premium),
            "moderation" => Ok(ActivityCategory::Moderation),
            "settings" => Ok(ActivityCategory::Settings),
            "verification" => Ok(ActivityCategory::Verification),
            _ => Err(AmoraError::Validation(format!("Invalid activity category: {}", s))),
        }
    }
}

/// One administrative action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: String,
    pub action: String,
    pub admin: String,
    pub target: String,
    pub description: String,
    pub category: ActivityCategory,
    pub timestamp: DateTime<Utc>,
}

/// Date buckets offered by the activity log page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    All,
}

impl DateRange {
    pub fn from_str(s: &str) -> AmoraResult<Self> {
        match s.to_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "all" => Ok(DateRange::All),
            _ => Err(AmoraError::Validation(format!("Invalid date range: {}", s))),
        }
    }

    /// Whether `timestamp` falls in this bucket as seen from `now`
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateRange::Today => timestamp.date_naive() == now.date_naive(),
            DateRange::Week => timestamp >= now - Duration::days(7),
            DateRange::Month => {
                let cutoff = now
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(30));
                timestamp >= cutoff
            }
            DateRange::All => true,
        }
    }
}

/// Predicates for `ActivityLog::list`; absent fields match everything
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub category: Option<ActivityCategory>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

impl LogFilter {
    pub fn category(category: ActivityCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    fn matches(&self, entry: &ActivityLogEntry, now: DateTime<Utc>) -> bool {
        if let Some(category) = self.category {
            if entry.category != category {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&entry.description, &entry.target, &entry.admin]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        self.date_range
            .map_or(true, |range| range.contains(entry.timestamp, now))
    }
}

/// Handle to the persisted activity log
#[derive(Clone)]
pub struct ActivityLog {
    repo: Repository,
}

impl ActivityLog {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Record an admin action on behalf of the signed-in admin.
    ///
    /// Best effort: a storage failure is logged and swallowed.
    pub async fn record(
        &self,
        action: &str,
        target: &str,
        description: &str,
        category: ActivityCategory,
    ) {
        if let Err(e) = self.try_record(action, target, description, category).await {
            warn!("Failed to record activity '{}': {}", action, e);
        }
    }

    async fn try_record(
        &self,
        action: &str,
        target: &str,
        description: &str,
        category: ActivityCategory,
    ) -> AmoraResult<ActivityLogEntry> {
        let admin = self
            .repo
            .load::<String>(StoreKey::AdminUsername)
            .await
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_ADMIN.to_string());

        let mut entries = self.entries().await;
        let now = Utc::now();
        let entry = ActivityLogEntry {
            id: unique_id(now, &entries),
            action: action.to_string(),
            admin,
            target: target.to_string(),
            description: description.to_string(),
            category,
            timestamp: now,
        };

        entries.insert(0, entry.clone());
        self.repo.save(StoreKey::ActivityLogs, &entries).await?;

        info!(
            "activity recorded: {} by {} on {} ({})",
            entry.action,
            entry.admin,
            entry.target,
            entry.category.as_str()
        );

        Ok(entry)
    }

    /// Entries matching `filter`, newest first, evaluated against the current time
    pub async fn list(&self, filter: &LogFilter) -> Vec<ActivityLogEntry> {
        self.list_at(filter, Utc::now()).await
    }

    /// Entries matching `filter` with date buckets evaluated at `now`
    pub async fn list_at(&self, filter: &LogFilter, now: DateTime<Utc>) -> Vec<ActivityLogEntry> {
        self.entries()
            .await
            .into_iter()
            .filter(|entry| filter.matches(entry, now))
            .collect()
    }

    /// The `limit` most recent entries
    pub async fn recent(&self, limit: usize) -> Vec<ActivityLogEntry> {
        let mut entries = self.entries().await;
        entries.truncate(limit);
        entries
    }

    /// Number of entries per category, including empty categories
    pub async fn category_counts(&self) -> BTreeMap<ActivityCategory, usize> {
        let mut counts: BTreeMap<ActivityCategory, usize> =
            ActivityCategory::ALL.iter().map(|c| (*c, 0)).collect();
        for entry in self.entries().await {
            *counts.entry(entry.category).or_insert(0) += 1;
        }
        counts
    }

    async fn entries(&self) -> Vec<ActivityLogEntry> {
        self.repo.load_or_default(StoreKey::ActivityLogs).await
    }
}

/// Millisecond timestamp id, suffixed when another entry already holds it
fn unique_id(now: DateTime<Utc>, existing: &[ActivityLogEntry]) -> String {
    let base = now.timestamp_millis().to_string();
    let taken = |candidate: &str| existing.iter().any(|e| e.id == candidate);

    if !taken(&base) {
        return base;
    }

    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
