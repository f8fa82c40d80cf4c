/// Member profile view and editing
use super::{
    auth::AuthData,
    onboarding::{self, OnboardingData, ProfileSetup},
};
use crate::{
    catalog::{Gender, Interest},
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
    validation::{self, FieldErrors},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// The member's own profile, assembled from onboarding and setup documents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub interested_in: Interest,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub bio: String,
    pub interests: Vec<String>,
    pub photos: Vec<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub verified: bool,
    pub premium: bool,
}

/// Profile page state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ProfileView {
    /// Onboarding or setup has not been completed
    Empty,
    Loaded { profile: MemberProfile },
}

/// Edit-profile form
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileForm {
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

impl EditProfileForm {
    pub fn validate_fields(&self) -> AmoraResult<()> {
        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "name", &self.name, "Name");
        errors.check(self);
        validation::require_phone(&mut errors, "phone", &self.phone);
        errors.into_result()
    }
}

#[derive(Clone)]
pub struct ProfileService {
    repo: Repository,
}

impl ProfileService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn view(&self) -> ProfileView {
        let onboarding: Option<OnboardingData> = self.repo.load(StoreKey::OnboardingData).await;
        let setup: Option<ProfileSetup> = self.repo.load(StoreKey::ProfileSetup).await;

        let (onboarding, setup) = match (onboarding, setup) {
            (Some(o), Some(s)) => (o, s),
            _ => return ProfileView::Empty,
        };

        let auth: Option<AuthData> = self.repo.load(StoreKey::AuthData).await;
        let premium: bool = self.repo.load_or_default(StoreKey::IsPremium).await;

        ProfileView::Loaded {
            profile: MemberProfile {
                name: onboarding.name,
                age: validation::age_on(onboarding.birth_date, Utc::now().date_naive()),
                gender: onboarding.gender,
                interested_in: onboarding.interested_in,
                location: onboarding.location,
                occupation: setup.occupation,
                bio: setup.bio,
                interests: setup.interests,
                photos: setup.photos,
                email: auth.as_ref().map(|a| a.email.clone()),
                phone: auth.as_ref().map(|a| a.phone.clone()),
                verified: auth.map_or(false, |a| a.verified),
                premium,
            },
        }
    }

    /// Apply the edit-profile form
    pub async fn edit(&self, form: EditProfileForm) -> AmoraResult<ProfileView> {
        form.validate_fields()?;

        let mut onboarding: OnboardingData = self
            .repo
            .load(StoreKey::OnboardingData)
            .await
            .ok_or_else(|| AmoraError::NotFound("Profile has not been set up".to_string()))?;
        let mut setup: ProfileSetup = self
            .repo
            .load(StoreKey::ProfileSetup)
            .await
            .ok_or_else(|| AmoraError::NotFound("Profile has not been set up".to_string()))?;

        onboarding.name = form.name.trim().to_string();
        if let Some(location) = form.location {
            onboarding.location = Some(location.trim().to_string()).filter(|l| !l.is_empty());
        }
        if let Some(bio) = form.bio {
            setup.bio = bio;
        }
        if let Some(occupation) = form.occupation {
            setup.occupation = Some(occupation);
        }
        if let Some(interests) = form.interests {
            setup.interests = interests;
        }
        let setup = onboarding::normalize_setup(setup);
        onboarding::validate_setup(&setup)?;

        self.repo.save(StoreKey::OnboardingData, &onboarding).await?;
        self.repo.save(StoreKey::ProfileSetup, &setup).await?;

        if let Some(mut auth) = self.repo.load::<AuthData>(StoreKey::AuthData).await {
            auth.name = onboarding.name.clone();
            auth.email = form.email.trim().to_lowercase();
            auth.phone = validation::digits_only(&form.phone);
            self.repo.save(StoreKey::AuthData, &auth).await?;
        }

        info!("profile updated for {}", onboarding.name);
        Ok(self.view().await)
    }
}
