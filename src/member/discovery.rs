/// Discovery feed, likes, passes and matches
use crate::{
    catalog::{self, Interest, MockProfile},
    error::{AmoraError, AmoraResult},
    matching::MatchingService,
    store::{Repository, StoreKey},
    validation::{FieldErrors, MINIMUM_AGE},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub const MAX_DISTANCE_KM: u32 = 500;

/// Feed filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryFilters {
    pub min_age: u32,
    pub max_age: u32,
    pub max_distance_km: u32,
    pub interested_in: Interest,
    pub verified_only: bool,
}

impl Default for DiscoveryFilters {
    fn default() -> Self {
        Self {
            min_age: MINIMUM_AGE,
            max_age: 50,
            max_distance_km: 50,
            interested_in: Interest::Everyone,
            verified_only: false,
        }
    }
}

impl DiscoveryFilters {
    pub fn validate(&self) -> AmoraResult<()> {
        let mut errors = FieldErrors::new();
        if self.min_age < MINIMUM_AGE {
            errors.push("minAge", format!("Minimum age is {}", MINIMUM_AGE));
        }
        if self.min_age > self.max_age {
            errors.push("maxAge", "Maximum age must not be below the minimum");
        }
        if self.max_distance_km == 0 || self.max_distance_km > MAX_DISTANCE_KM {
            errors.push(
                "maxDistanceKm",
                format!("Distance must be between 1 and {} km", MAX_DISTANCE_KM),
            );
        }
        errors.into_result()
    }

    fn accepts(&self, profile: &MockProfile) -> bool {
        (self.min_age..=self.max_age).contains(&profile.age)
            && profile.distance_km <= self.max_distance_km
            && self.interested_in.accepts(profile.gender)
            && (!self.verified_only || profile.verified)
    }
}

/// A simulated match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub user_id: String,
    pub matched_at: DateTime<Utc>,
}

/// A match joined with catalog details
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub user_id: String,
    pub name: String,
    pub photo: Option<String>,
    pub matched_at: DateTime<Utc>,
}

/// Result of a like
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub user_id: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct DiscoveryService {
    repo: Repository,
    matching: Arc<dyn MatchingService>,
}

impl DiscoveryService {
    pub fn new(repo: Repository, matching: Arc<dyn MatchingService>) -> Self {
        Self { repo, matching }
    }

    /// Profiles not yet liked, passed or blocked that fit the saved filters
    pub async fn feed(&self) -> Vec<MockProfile> {
        let filters = self.filters().await;
        let mut seen: HashSet<String> = HashSet::new();
        for key in [
            StoreKey::DiscoveryLikes,
            StoreKey::DiscoveryPasses,
            StoreKey::BlockedUsers,
        ] {
            let ids: Vec<String> = self.repo.load_or_default(key).await;
            seen.extend(ids);
        }

        let feed: Vec<MockProfile> = catalog::profiles()
            .iter()
            .filter(|p| !seen.contains(p.id) && filters.accepts(p))
            .cloned()
            .collect();

        debug!("discovery feed: {} profiles", feed.len());
        feed
    }

    pub async fn filters(&self) -> DiscoveryFilters {
        self.repo.load_or_default(StoreKey::DiscoveryFilters).await
    }

    pub async fn set_filters(&self, filters: DiscoveryFilters) -> AmoraResult<DiscoveryFilters> {
        filters.validate()?;
        self.repo.save(StoreKey::DiscoveryFilters, &filters).await?;
        Ok(filters)
    }

    /// Like a profile; the matching service decides whether it is mutual
    pub async fn like(&self, user_id: &str) -> AmoraResult<LikeOutcome> {
        let profile = catalog::find(user_id)
            .ok_or_else(|| AmoraError::NotFound(format!("Profile {} not found", user_id)))?;

        self.repo.push_unique_id(StoreKey::DiscoveryLikes, user_id).await?;

        let mut matches = self.match_records().await;
        if let Some(existing) = matches.iter().find(|m| m.user_id == user_id) {
            return Ok(LikeOutcome {
                user_id: user_id.to_string(),
                matched: true,
                matched_at: Some(existing.matched_at),
            });
        }

        if !self.matching.is_match(user_id) {
            debug!("liked {} without a match", user_id);
            return Ok(LikeOutcome {
                user_id: user_id.to_string(),
                matched: false,
                matched_at: None,
            });
        }

        let record = MatchRecord {
            user_id: user_id.to_string(),
            matched_at: Utc::now(),
        };
        matches.push(record.clone());
        self.repo.save(StoreKey::DiscoveryMatches, &matches).await?;

        info!("new match with {} ({})", profile.name, user_id);
        Ok(LikeOutcome {
            user_id: record.user_id,
            matched: true,
            matched_at: Some(record.matched_at),
        })
    }

    pub async fn pass(&self, user_id: &str) -> AmoraResult<()> {
        if catalog::find(user_id).is_none() {
            return Err(AmoraError::NotFound(format!("Profile {} not found", user_id)));
        }
        self.repo.push_unique_id(StoreKey::DiscoveryPasses, user_id).await?;
        debug!("passed on {}", user_id);
        Ok(())
    }

    /// Matches, newest first, with unknown ids shown as a placeholder
    pub async fn matches(&self) -> Vec<MatchView> {
        let mut views: Vec<MatchView> = self
            .match_records()
            .await
            .into_iter()
            .map(|record| {
                let profile = catalog::find(&record.user_id);
                MatchView {
                    name: catalog::display_name(&record.user_id),
                    photo: profile.and_then(|p| p.photos.first()).map(|s| s.to_string()),
                    user_id: record.user_id,
                    matched_at: record.matched_at,
                }
            })
            .collect();
        views.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
        views
    }

    pub async fn match_records(&self) -> Vec<MatchRecord> {
        self.repo.load_or_default(StoreKey::DiscoveryMatches).await
    }

    pub async fn is_match(&self, user_id: &str) -> bool {
        self.match_records().await.iter().any(|m| m.user_id == user_id)
    }
}
