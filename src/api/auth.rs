/// Member sign-in, onboarding and profile endpoints
use crate::{
    context::AppContext,
    error::AmoraResult,
    member::{
        EditProfileForm, LoginRequest, OnboardingData, ProfileSetup, ProfileView, SessionInfo,
        SignupRequest,
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

/// Build member auth and profile routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
        .route("/api/onboarding", put(save_onboarding))
        .route("/api/profile-setup", put(save_profile_setup))
        .route("/api/profile", get(get_profile).put(edit_profile))
}

async fn signup(
    State(ctx): State<AppContext>,
    Json(req): Json<SignupRequest>,
) -> AmoraResult<(StatusCode, Json<SessionInfo>)> {
    let session = ctx.auth.signup(req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> AmoraResult<Json<SessionInfo>> {
    Ok(Json(ctx.auth.login(req).await?))
}

#[derive(Debug, Deserialize)]
struct VerifyOtpRequest {
    code: String,
}

async fn verify_otp(
    State(ctx): State<AppContext>,
    Json(req): Json<VerifyOtpRequest>,
) -> AmoraResult<Json<SessionInfo>> {
    Ok(Json(ctx.auth.verify_otp(&req.code).await?))
}

async fn logout(State(ctx): State<AppContext>) -> AmoraResult<StatusCode> {
    ctx.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session(State(ctx): State<AppContext>) -> Json<SessionInfo> {
    Json(ctx.auth.session().await)
}

async fn save_onboarding(
    State(ctx): State<AppContext>,
    Json(data): Json<OnboardingData>,
) -> AmoraResult<Json<OnboardingData>> {
    Ok(Json(ctx.onboarding.save(data).await?))
}

async fn save_profile_setup(
    State(ctx): State<AppContext>,
    Json(setup): Json<ProfileSetup>,
) -> AmoraResult<Json<ProfileSetup>> {
    Ok(Json(ctx.onboarding.complete_profile_setup(setup).await?))
}

async fn get_profile(State(ctx): State<AppContext>) -> Json<ProfileView> {
    Json(ctx.profile.view().await)
}

async fn edit_profile(
    State(ctx): State<AppContext>,
    Json(form): Json<EditProfileForm>,
) -> AmoraResult<Json<ProfileView>> {
    Ok(Json(ctx.profile.edit(form).await?))
}
