/// Admin console API
///
/// Everything except login requires an admin session via `AdminAuthContext`.
use crate::{
    activity::{ActivityCategory, ActivityLogEntry, DateRange, LogFilter},
    admin::{
        AdminLoginRequest, AdminSessionInfo, AdminUserView, CreatePromoCode, DashboardStats,
        ModerationAction, ModerationItem, PlatformSettings, PromoCode, UserQuery,
        VerificationRequest,
    },
    auth::AdminAuthContext,
    billing::{Payment, PaymentStatus},
    context::AppContext,
    error::AmoraResult,
    member::ReportRecord,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build admin API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/session", get(session))
        .route("/api/admin/dashboard", get(dashboard))
        // Users
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id", get(get_user))
        .route("/api/admin/users/:id/ban", post(ban_user))
        .route("/api/admin/users/:id/suspend", post(suspend_user))
        .route("/api/admin/users/:id/reactivate", post(reactivate_user))
        // Verification
        .route("/api/admin/verification", get(list_verifications))
        .route("/api/admin/verification/:id/approve", post(approve_verification))
        .route("/api/admin/verification/:id/reject", post(reject_verification))
        // Moderation
        .route("/api/admin/moderation", get(moderation_queue))
        .route("/api/admin/moderation/:id/resolve", post(resolve_report))
        // Premium
        .route("/api/admin/premium/:id/grant", post(grant_premium))
        .route("/api/admin/premium/:id/revoke", post(revoke_premium))
        .route("/api/admin/promo-codes", get(list_promo_codes).post(create_promo_code))
        .route("/api/admin/promo-codes/:code/deactivate", post(deactivate_promo_code))
        .route("/api/admin/payments", get(list_payments))
        .route("/api/admin/payments/:id/refund", post(refund_payment))
        // Platform
        .route("/api/admin/settings", get(get_platform_settings).put(update_platform_settings))
        .route("/api/admin/activity-logs", get(activity_logs))
}

// ============================================================================
// Session
// ============================================================================

async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<AdminLoginRequest>,
) -> AmoraResult<Json<AdminSessionInfo>> {
    Ok(Json(ctx.admin_session.login(req).await?))
}

async fn logout(State(ctx): State<AppContext>, _auth: AdminAuthContext) -> AmoraResult<StatusCode> {
    ctx.admin_session.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session(State(ctx): State<AppContext>) -> Json<AdminSessionInfo> {
    Json(ctx.admin_session.current().await)
}

async fn dashboard(State(ctx): State<AppContext>, _auth: AdminAuthContext) -> Json<DashboardStats> {
    Json(ctx.dashboard.stats().await)
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Serialize)]
struct UsersResponse {
    users: Vec<AdminUserView>,
}

async fn list_users(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Query(query): Query<UserQuery>,
) -> Json<UsersResponse> {
    Json(UsersResponse {
        users: ctx.users.list(&query).await,
    })
}

async fn get_user(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
) -> AmoraResult<Json<AdminUserView>> {
    Ok(Json(ctx.users.get(&id).await?))
}

#[derive(Debug, Deserialize)]
struct ReasonRequest {
    #[serde(default)]
    reason: String,
}

async fn ban_user(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> AmoraResult<Json<AdminUserView>> {
    Ok(Json(ctx.users.ban(&id, &req.reason).await?))
}

async fn suspend_user(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> AmoraResult<Json<AdminUserView>> {
    Ok(Json(ctx.users.suspend(&id, &req.reason).await?))
}

async fn reactivate_user(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
) -> AmoraResult<Json<AdminUserView>> {
    Ok(Json(ctx.users.reactivate(&id).await?))
}

// ============================================================================
// Verification
// ============================================================================

#[derive(Debug, Deserialize)]
struct VerificationQuery {
    #[serde(default)]
    pending: bool,
}

#[derive(Debug, Serialize)]
struct VerificationResponse {
    requests: Vec<VerificationRequest>,
}

async fn list_verifications(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Query(query): Query<VerificationQuery>,
) -> Json<VerificationResponse> {
    let requests = if query.pending {
        ctx.verification.pending().await
    } else {
        ctx.verification.all().await
    };
    Json(VerificationResponse { requests })
}

async fn approve_verification(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    Path(id): Path<String>,
) -> AmoraResult<Json<VerificationRequest>> {
    Ok(Json(ctx.verification.approve(&id, &auth.username).await?))
}

async fn reject_verification(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> AmoraResult<Json<VerificationRequest>> {
    Ok(Json(
        ctx.verification
            .reject(&id, &auth.username, &req.reason)
            .await?,
    ))
}

// ============================================================================
// Moderation
// ============================================================================

#[derive(Debug, Deserialize)]
struct ModerationQuery {
    #[serde(default)]
    open: bool,
}

#[derive(Debug, Serialize)]
struct ModerationResponse {
    reports: Vec<ModerationItem>,
}

async fn moderation_queue(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Query(query): Query<ModerationQuery>,
) -> Json<ModerationResponse> {
    Json(ModerationResponse {
        reports: ctx.moderation.list(query.open).await,
    })
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    action: ModerationAction,
    #[serde(default)]
    note: Option<String>,
}

async fn resolve_report(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    Path(id): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> AmoraResult<Json<ReportRecord>> {
    Ok(Json(
        ctx.moderation
            .resolve(&id, req.action, req.note, &auth.username)
            .await?,
    ))
}

// ============================================================================
// Premium
// ============================================================================

async fn grant_premium(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
) -> AmoraResult<Json<AdminUserView>> {
    Ok(Json(ctx.premium_admin.grant(&id).await?))
}

async fn revoke_premium(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
) -> AmoraResult<Json<AdminUserView>> {
    Ok(Json(ctx.premium_admin.revoke(&id).await?))
}

#[derive(Debug, Serialize)]
struct PromoCodesResponse {
    codes: Vec<PromoCode>,
}

async fn list_promo_codes(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
) -> Json<PromoCodesResponse> {
    Json(PromoCodesResponse {
        codes: ctx.premium_admin.promo_codes().await,
    })
}

async fn create_promo_code(
    State(ctx): State<AppContext>,
    auth: AdminAuthContext,
    Json(req): Json<CreatePromoCode>,
) -> AmoraResult<(StatusCode, Json<PromoCode>)> {
    let code = ctx
        .premium_admin
        .create_promo_code(req, &auth.username)
        .await?;
    Ok((StatusCode::CREATED, Json(code)))
}

async fn deactivate_promo_code(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(code): Path<String>,
) -> AmoraResult<Json<PromoCode>> {
    Ok(Json(ctx.premium_admin.deactivate_promo_code(&code).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentsResponse {
    payments: Vec<Payment>,
    revenue_cents: u64,
}

async fn list_payments(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
) -> Json<PaymentsResponse> {
    let payments = ctx.premium_admin.payments().await;
    let revenue_cents = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| u64::from(p.amount_cents))
        .sum();
    Json(PaymentsResponse {
        payments,
        revenue_cents,
    })
}

async fn refund_payment(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Path(id): Path<String>,
) -> AmoraResult<Json<Payment>> {
    Ok(Json(ctx.premium_admin.refund(&id).await?))
}

// ============================================================================
// Platform settings and activity log
// ============================================================================

async fn get_platform_settings(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
) -> Json<PlatformSettings> {
    Json(ctx.platform.get().await)
}

async fn update_platform_settings(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Json(settings): Json<PlatformSettings>,
) -> AmoraResult<Json<PlatformSettings>> {
    Ok(Json(ctx.platform.update(settings).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityLogQuery {
    category: Option<String>,
    search: Option<String>,
    date_range: Option<String>,
}

impl ActivityLogQuery {
    /// `all` and empty values mean no restriction
    fn into_filter(self) -> AmoraResult<LogFilter> {
        let selected = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        };

        Ok(LogFilter {
            category: selected(self.category)
                .map(|c| ActivityCategory::from_str(&c))
                .transpose()?,
            search: self.search,
            date_range: selected(self.date_range)
                .map(|d| DateRange::from_str(&d))
                .transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct ActivityLogResponse {
    entries: Vec<ActivityLogEntry>,
    counts: BTreeMap<ActivityCategory, usize>,
}

async fn activity_logs(
    State(ctx): State<AppContext>,
    _auth: AdminAuthContext,
    Query(query): Query<ActivityLogQuery>,
) -> AmoraResult<Json<ActivityLogResponse>> {
    let filter = query.into_filter()?;
    Ok(Json(ActivityLogResponse {
        entries: ctx.activity.list(&filter).await,
        counts: ctx.activity.category_counts().await,
    }))
}
