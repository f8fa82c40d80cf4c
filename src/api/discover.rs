/// Discovery, matches, liked-you and chat endpoints
use crate::{
    catalog::MockProfile,
    context::AppContext,
    error::AmoraResult,
    member::{ChatMessage, ChatSummary, DiscoveryFilters, LikeOutcome, LikedYouView, MatchView},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build discovery and messaging routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/discover", get(feed))
        .route("/api/discover/:id/like", post(like))
        .route("/api/discover/:id/pass", post(pass))
        .route("/api/filters", get(get_filters).put(set_filters))
        .route("/api/matches", get(matches))
        .route("/api/liked-you", get(liked_you))
        .route("/api/chats", get(list_chats))
        .route("/api/chats/:user_id", get(thread).post(send_message))
}

#[derive(Debug, Serialize)]
struct FeedResponse {
    profiles: Vec<MockProfile>,
}

async fn feed(State(ctx): State<AppContext>) -> Json<FeedResponse> {
    Json(FeedResponse {
        profiles: ctx.discovery.feed().await,
    })
}

async fn like(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> AmoraResult<Json<LikeOutcome>> {
    Ok(Json(ctx.discovery.like(&id).await?))
}

async fn pass(State(ctx): State<AppContext>, Path(id): Path<String>) -> AmoraResult<StatusCode> {
    ctx.discovery.pass(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_filters(State(ctx): State<AppContext>) -> Json<DiscoveryFilters> {
    Json(ctx.discovery.filters().await)
}

async fn set_filters(
    State(ctx): State<AppContext>,
    Json(filters): Json<DiscoveryFilters>,
) -> AmoraResult<Json<DiscoveryFilters>> {
    Ok(Json(ctx.discovery.set_filters(filters).await?))
}

#[derive(Debug, Serialize)]
struct MatchesResponse {
    matches: Vec<MatchView>,
}

async fn matches(State(ctx): State<AppContext>) -> Json<MatchesResponse> {
    Json(MatchesResponse {
        matches: ctx.discovery.matches().await,
    })
}

async fn liked_you(State(ctx): State<AppContext>) -> Json<LikedYouView> {
    Json(ctx.liked_you.view().await)
}

#[derive(Debug, Serialize)]
struct ChatsResponse {
    chats: Vec<ChatSummary>,
}

async fn list_chats(State(ctx): State<AppContext>) -> Json<ChatsResponse> {
    Json(ChatsResponse {
        chats: ctx.chats.list().await,
    })
}

#[derive(Debug, Serialize)]
struct ThreadResponse {
    messages: Vec<ChatMessage>,
}

async fn thread(
    State(ctx): State<AppContext>,
    Path(user_id): Path<String>,
) -> AmoraResult<Json<ThreadResponse>> {
    Ok(Json(ThreadResponse {
        messages: ctx.chats.thread(&user_id).await?,
    }))
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    text: String,
}

async fn send_message(
    State(ctx): State<AppContext>,
    Path(user_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> AmoraResult<(StatusCode, Json<ChatMessage>)> {
    let message = ctx.chats.send(&user_id, &req.text).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
