/// Admin console flows driven through the HTTP router
mod common;

use axum::http::StatusCode;
use common::test_app;
use serde_json::json;

#[tokio::test]
async fn test_admin_routes_require_login() {
    let app = test_app();

    let (status, body) = app.get("/api/admin/dashboard").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AuthenticationRequired");

    let (status, _) = app
        .post(
            "/api/admin/login",
            json!({ "username": "admin", "password": "letmein" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.admin_login().await;
    let (status, stats) = app.get("/api/admin/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 10);
    assert_eq!(stats["recentActivity"][0]["action"], "admin_login");

    let (status, _) = app.post("/api/admin/logout", json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/api/admin/users").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ban_is_logged_with_admin_name() {
    let app = test_app();
    app.admin_login().await;

    let (status, user) = app
        .post("/api/admin/users/4/ban", json!({ "reason": "Scam messages" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["status"], "banned");

    let (_, users) = app.get("/api/admin/users?status=banned").await;
    assert_eq!(users["users"].as_array().unwrap().len(), 1);

    let (_, logs) = app
        .get("/api/admin/activity-logs?category=moderation&dateRange=today")
        .await;
    let entries = logs["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "user_banned");
    assert_eq!(entries[0]["admin"], "admin");
    assert_eq!(entries[0]["target"], "User ID: 4");
    assert_eq!(logs["counts"]["moderation"], 1);
    assert_eq!(logs["counts"]["settings"], 1);

    let (status, _) = app.post("/api/admin/users/4/ban", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_log_search_and_all_filters() {
    let app = test_app();
    app.admin_login().await;
    app.post("/api/admin/users/1/suspend", json!({ "reason": "Spam" }))
        .await;
    app.post("/api/admin/premium/8/grant", json!({})).await;

    let (_, logs) = app
        .get("/api/admin/activity-logs?category=all&dateRange=all&search=SOPHIA")
        .await;
    let entries = logs["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "premium");

    let (status, _) = app.get("/api/admin/activity-logs?dateRange=decade").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_report_resolved_by_admin() {
    let app = test_app();
    let (_, report) = app
        .post(
            "/api/safety/report/7",
            json!({ "reason": "harassment", "details": "Rude messages" }),
        )
        .await;
    let report_id = report["id"].as_str().unwrap().to_string();

    app.admin_login().await;
    let (_, queue) = app.get("/api/admin/moderation?open=true").await;
    assert_eq!(queue["reports"][0]["userName"], "Daniel");
    assert_eq!(queue["reports"][0]["reasonLabel"], "Harassment");

    let uri = format!("/api/admin/moderation/{}/resolve", report_id);
    let (status, resolved) = app.post(&uri, json!({ "action": "ban" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "resolved");
    assert_eq!(resolved["reviewedBy"], "admin");

    let (_, user) = app.get("/api/admin/users/7").await;
    assert_eq!(user["status"], "banned");

    let (status, _) = app.post(&uri, json!({ "action": "dismiss" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_verification_review() {
    let app = test_app();
    app.admin_login().await;

    let (_, pending) = app.get("/api/admin/verification?pending=true").await;
    assert_eq!(pending["requests"].as_array().unwrap().len(), 4);

    let (status, _) = app
        .post("/api/admin/verification/ver_3/reject", json!({ "reason": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, approved) = app
        .post("/api/admin/verification/ver_3/approve", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let (_, stats) = app.get("/api/admin/dashboard").await;
    assert_eq!(stats["pendingVerifications"], 3);
    assert_eq!(stats["verifiedUsers"], 7);
}

#[tokio::test]
async fn test_promo_codes_and_refunds() {
    let app = test_app();
    app.admin_login().await;

    let (status, promo) = app
        .post(
            "/api/admin/promo-codes",
            json!({ "code": "summer30", "discountPercent": 30, "maxUses": 200 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(promo["code"], "SUMMER30");
    assert_eq!(promo["createdBy"], "admin");

    let (status, _) = app
        .post(
            "/api/admin/promo-codes",
            json!({ "code": "SUMMER30", "discountPercent": 10, "maxUses": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, codes) = app.get("/api/admin/promo-codes").await;
    assert_eq!(codes["codes"].as_array().unwrap().len(), 3);

    let (_, payments) = app.get("/api/admin/payments").await;
    assert_eq!(payments["revenueCents"], 7998);

    let (status, refunded) = app
        .post("/api/admin/payments/pay_seed_2/refund", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refunded["status"], "refunded");

    let (_, payments) = app.get("/api/admin/payments").await;
    assert_eq!(payments["revenueCents"], 5999);

    let (_, logs) = app.get("/api/admin/activity-logs?category=premium").await;
    assert_eq!(logs["entries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_platform_settings_round_trip() {
    let app = test_app();
    app.admin_login().await;

    let (_, mut settings) = app.get("/api/admin/settings").await;
    assert_eq!(settings["allowSignups"], true);

    settings["allowSignups"] = json!(false);
    let (status, saved) = app.put("/api/admin/settings", settings).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["allowSignups"], false);

    let (status, _) = app
        .put("/api/admin/settings", json!({ "minimumAge": 12 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
