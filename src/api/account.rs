/// Settings, safety and premium endpoints
use crate::{
    billing::Payment,
    context::AppContext,
    error::AmoraResult,
    member::{
        BlockedUser, PremiumStatus, ReportReason, ReportRecord, SafetyTip, SettingToggle,
        UserSettings, Visibility,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build settings, safety and premium routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings/toggles/:name", put(set_toggle))
        .route("/api/settings/visibility", put(set_visibility))
        .route("/api/settings/blocked/:id", delete(unblock))
        .route("/api/account", delete(delete_account))
        .route("/api/safety", get(safety_center))
        .route("/api/safety/block/:id", post(block))
        .route("/api/safety/report/:id", post(report))
        .route("/api/premium", get(premium_status))
        .route("/api/premium/subscribe", post(subscribe))
        .route("/api/premium/cancel", post(cancel_premium))
}

#[derive(Debug, Serialize)]
struct SettingsResponse {
    settings: UserSettings,
    blocked: Vec<BlockedUser>,
}

async fn get_settings(State(ctx): State<AppContext>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        settings: ctx.settings.load().await,
        blocked: ctx.settings.blocked().await,
    })
}

#[derive(Debug, Deserialize)]
struct ToggleRequest {
    value: bool,
}

async fn set_toggle(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AmoraResult<Json<UserSettings>> {
    let toggle = SettingToggle::from_str(&name)?;
    Ok(Json(ctx.settings.set_toggle(toggle, req.value).await?))
}

#[derive(Debug, Deserialize)]
struct VisibilityRequest {
    visibility: Visibility,
}

async fn set_visibility(
    State(ctx): State<AppContext>,
    Json(req): Json<VisibilityRequest>,
) -> AmoraResult<Json<UserSettings>> {
    Ok(Json(ctx.settings.set_visibility(req.visibility).await?))
}

#[derive(Debug, Serialize)]
struct UnblockResponse {
    unblocked: bool,
}

async fn unblock(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> AmoraResult<Json<UnblockResponse>> {
    Ok(Json(UnblockResponse {
        unblocked: ctx.settings.unblock(&id).await?,
    }))
}

async fn delete_account(State(ctx): State<AppContext>) -> AmoraResult<StatusCode> {
    ctx.settings.delete_account().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct SafetyResponse {
    tips: &'static [SafetyTip],
    blocked: Vec<BlockedUser>,
}

async fn safety_center(State(ctx): State<AppContext>) -> Json<SafetyResponse> {
    Json(SafetyResponse {
        tips: ctx.safety.tips(),
        blocked: ctx.settings.blocked().await,
    })
}

async fn block(State(ctx): State<AppContext>, Path(id): Path<String>) -> AmoraResult<StatusCode> {
    ctx.safety.block(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    reason: ReportReason,
    #[serde(default)]
    details: Option<String>,
}

async fn report(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<ReportRequest>,
) -> AmoraResult<(StatusCode, Json<ReportRecord>)> {
    let record = ctx.safety.report(&id, req.reason, req.details).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn premium_status(State(ctx): State<AppContext>) -> Json<PremiumStatus> {
    Json(ctx.premium.status().await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest {
    plan_id: String,
}

async fn subscribe(
    State(ctx): State<AppContext>,
    Json(req): Json<SubscribeRequest>,
) -> AmoraResult<(StatusCode, Json<Payment>)> {
    let payment = ctx.premium.subscribe(&req.plan_id).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn cancel_premium(State(ctx): State<AppContext>) -> AmoraResult<StatusCode> {
    ctx.premium.cancel().await?;
    Ok(StatusCode::NO_CONTENT)
}
