/// Onboarding and first-time profile setup
use crate::{
    catalog::{Gender, Interest},
    error::AmoraResult,
    store::{Repository, StoreKey},
    validation::{self, FieldErrors, MINIMUM_AGE},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MAX_PHOTOS: usize = 6;
pub const MAX_BIO_CHARS: usize = 500;
pub const MIN_INTERESTS: usize = 3;
pub const MAX_INTERESTS: usize = 10;

/// Answers from the onboarding screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub interested_in: Interest,
    #[serde(default)]
    pub location: Option<String>,
}

/// Profile details entered after onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSetup {
    pub bio: String,
    pub interests: Vec<String>,
    pub photos: Vec<String>,
    #[serde(default)]
    pub occupation: Option<String>,
}

#[derive(Clone)]
pub struct OnboardingService {
    repo: Repository,
}

impl OnboardingService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn save(&self, data: OnboardingData) -> AmoraResult<OnboardingData> {
        self.save_as_of(data, Utc::now().date_naive()).await
    }

    /// Save onboarding answers, checking the age against `today`
    pub async fn save_as_of(
        &self,
        mut data: OnboardingData,
        today: NaiveDate,
    ) -> AmoraResult<OnboardingData> {
        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "name", &data.name, "Name");
        if validation::age_on(data.birth_date, today) < MINIMUM_AGE {
            errors.push("birthDate", format!("You must be at least {} to join", MINIMUM_AGE));
        }
        errors.into_result()?;

        data.name = data.name.trim().to_string();
        data.location = data
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        self.repo.save(StoreKey::OnboardingData, &data).await?;
        info!("onboarding saved for {}", data.name);
        Ok(data)
    }

    pub async fn complete_profile_setup(&self, setup: ProfileSetup) -> AmoraResult<ProfileSetup> {
        let setup = normalize_setup(setup);
        validate_setup(&setup)?;

        self.repo.save(StoreKey::ProfileSetup, &setup).await?;
        info!(
            "profile setup saved: {} photos, {} interests",
            setup.photos.len(),
            setup.interests.len()
        );
        Ok(setup)
    }

    pub async fn onboarding(&self) -> Option<OnboardingData> {
        self.repo.load(StoreKey::OnboardingData).await
    }
}

/// Trim text and drop blank or repeated interests and photos
pub(crate) fn normalize_setup(mut setup: ProfileSetup) -> ProfileSetup {
    setup.bio = setup.bio.trim().to_string();
    setup.occupation = setup
        .occupation
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    let mut interests: Vec<String> = Vec::new();
    for interest in setup.interests {
        let interest = interest.trim().to_string();
        if !interest.is_empty() && !interests.iter().any(|i| i.eq_ignore_ascii_case(&interest)) {
            interests.push(interest);
        }
    }
    setup.interests = interests;

    let mut photos: Vec<String> = Vec::new();
    for photo in setup.photos {
        let photo = photo.trim().to_string();
        if !photo.is_empty() && !photos.contains(&photo) {
            photos.push(photo);
        }
    }
    setup.photos = photos;
    setup
}

pub(crate) fn validate_setup(setup: &ProfileSetup) -> AmoraResult<()> {
    let mut errors = FieldErrors::new();

    if setup.photos.is_empty() {
        errors.push("photos", "Add at least one photo");
    } else if setup.photos.len() > MAX_PHOTOS {
        errors.push("photos", format!("You can add up to {} photos", MAX_PHOTOS));
    }

    if setup.bio.chars().count() > MAX_BIO_CHARS {
        errors.push("bio", format!("Bio must be {} characters or fewer", MAX_BIO_CHARS));
    }

    if !(MIN_INTERESTS..=MAX_INTERESTS).contains(&setup.interests.len()) {
        errors.push(
            "interests",
            format!("Pick between {} and {} interests", MIN_INTERESTS, MAX_INTERESTS),
        );
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmoraError;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> OnboardingService {
        OnboardingService::new(Repository::new(Arc::new(MemoryStore::new())))
    }

    fn answers(birth_date: NaiveDate) -> OnboardingData {
        OnboardingData {
            name: " Riley ".to_string(),
            birth_date,
            gender: Gender::Woman,
            interested_in: Interest::Everyone,
            location: Some("Brooklyn, NY".to_string()),
        }
    }

    #[tokio::test]
    async fn test_underage_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let result = service()
            .save_as_of(answers(NaiveDate::from_ymd_opt(2007, 1, 1).unwrap()), today)
            .await;
        assert!(matches!(result, Err(AmoraError::Validation(_))));

        let saved = service()
            .save_as_of(answers(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()), today)
            .await
            .unwrap();
        assert_eq!(saved.name, "Riley");
    }

    #[tokio::test]
    async fn test_profile_setup_rules() {
        let service = service();

        let too_few = ProfileSetup {
            bio: "Hi".to_string(),
            interests: vec!["Music".to_string(), "music".to_string(), "Art".to_string()],
            photos: vec!["/a.jpg".to_string()],
            occupation: None,
        };
        // "music" collapses into "Music", leaving two interests
        assert!(service.complete_profile_setup(too_few).await.is_err());

        let no_photo = ProfileSetup {
            bio: "Hi".to_string(),
            interests: vec!["Music".into(), "Art".into(), "Food".into()],
            photos: vec![" ".to_string()],
            occupation: None,
        };
        assert!(service.complete_profile_setup(no_photo).await.is_err());

        let ok = ProfileSetup {
            bio: "  Hi there ".to_string(),
            interests: vec!["Music".into(), "Art".into(), "Food".into()],
            photos: vec!["/a.jpg".into(), "/a.jpg".into(), "/b.jpg".into()],
            occupation: Some("".to_string()),
        };
        let saved = service.complete_profile_setup(ok).await.unwrap();
        assert_eq!(saved.bio, "Hi there");
        assert_eq!(saved.photos, vec!["/a.jpg", "/b.jpg"]);
        assert_eq!(saved.occupation, None);
    }
}
