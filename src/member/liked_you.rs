/// "Liked you" page
///
/// The list is derived on every load: catalog profiles the member has not
/// liked yet, each with a freshly drawn "new" flag. Without premium only
/// the count and flags are revealed.
use crate::{
    catalog,
    matching::MatchingService,
    store::{Repository, StoreKey},
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedYouProfile {
    pub id: String,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedYouView {
    pub locked: bool,
    pub count: usize,
    pub new_count: usize,
    pub profiles: Vec<LikedYouProfile>,
}

#[derive(Clone)]
pub struct LikedYouService {
    repo: Repository,
    matching: Arc<dyn MatchingService>,
}

impl LikedYouService {
    pub fn new(repo: Repository, matching: Arc<dyn MatchingService>) -> Self {
        Self { repo, matching }
    }

    pub async fn view(&self) -> LikedYouView {
        let premium: bool = self.repo.load_or_default(StoreKey::IsPremium).await;
        let liked: HashSet<String> = self
            .repo
            .load_or_default::<Vec<String>>(StoreKey::DiscoveryLikes)
            .await
            .into_iter()
            .collect();

        let profiles: Vec<LikedYouProfile> = catalog::profiles()
            .iter()
            .filter(|p| !liked.contains(p.id))
            .map(|p| {
                let is_new = self.matching.is_new(p.id);
                if premium {
                    LikedYouProfile {
                        id: p.id.to_string(),
                        is_new,
                        name: Some(p.name.to_string()),
                        age: Some(p.age),
                        photo: p.photos.first().map(|s| s.to_string()),
                    }
                } else {
                    LikedYouProfile {
                        id: p.id.to_string(),
                        is_new,
                        name: None,
                        age: None,
                        photo: None,
                    }
                }
            })
            .collect();

        LikedYouView {
            locked: !premium,
            count: profiles.len(),
            new_count: profiles.iter().filter(|p| p.is_new).count(),
            profiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::ScriptedMatching;
    use crate::store::MemoryStore;

    fn service() -> (LikedYouService, Repository) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let matching = ScriptedMatching::new().new_profiles(["2", "5"]);
        (LikedYouService::new(repo.clone(), Arc::new(matching)), repo)
    }

    #[tokio::test]
    async fn test_excludes_liked_and_locks_without_premium() {
        let (service, repo) = service();
        repo.save(StoreKey::DiscoveryLikes, &vec!["1", "2"]).await.unwrap();

        let view = service.view().await;
        assert!(view.locked);
        assert_eq!(view.count, catalog::profiles().len() - 2);
        assert_eq!(view.new_count, 1);
        assert!(view.profiles.iter().all(|p| p.name.is_none()));
        assert!(!view.profiles.iter().any(|p| p.id == "1" || p.id == "2"));
    }

    #[tokio::test]
    async fn test_premium_reveals_profiles() {
        let (service, repo) = service();
        repo.save(StoreKey::IsPremium, &true).await.unwrap();

        let view = service.view().await;
        assert!(!view.locked);
        assert_eq!(view.new_count, 2);
        assert!(view.profiles.iter().all(|p| p.name.is_some()));
    }
}
