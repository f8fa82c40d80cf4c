/// Chat list and conversations with matches
use super::discovery::MatchRecord;
use crate::{
    catalog,
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Conversations keyed by the other member's id
type Conversations = BTreeMap<String, Vec<ChatMessage>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub from_me: bool,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// One row of the chat list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub user_id: String,
    pub name: String,
    pub photo: Option<String>,
    pub last_message: Option<String>,
    pub last_activity: DateTime<Utc>,
    /// The last message came from the other member
    pub unread: bool,
}

#[derive(Clone)]
pub struct ChatService {
    repo: Repository,
}

impl ChatService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// One entry per match, most recent activity first
    pub async fn list(&self) -> Vec<ChatSummary> {
        let conversations = self.conversations().await;
        let matches: Vec<MatchRecord> = self.repo.load_or_default(StoreKey::DiscoveryMatches).await;

        let mut chats: Vec<ChatSummary> = matches
            .into_iter()
            .map(|record| {
                let messages = thread_or_greeting(&conversations, &record);
                let last = messages.last();
                let profile = catalog::find(&record.user_id);

                ChatSummary {
                    name: catalog::display_name(&record.user_id),
                    photo: profile.and_then(|p| p.photos.first()).map(|s| s.to_string()),
                    last_message: last.map(|m| m.text.clone()),
                    last_activity: last.map_or(record.matched_at, |m| m.sent_at),
                    unread: last.map_or(false, |m| !m.from_me),
                    user_id: record.user_id,
                }
            })
            .collect();

        chats.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        chats
    }

    /// Messages exchanged with a match, oldest first
    pub async fn thread(&self, user_id: &str) -> AmoraResult<Vec<ChatMessage>> {
        let record = self.require_match(user_id).await?;
        Ok(thread_or_greeting(&self.conversations().await, &record))
    }

    pub async fn send(&self, user_id: &str, text: &str) -> AmoraResult<ChatMessage> {
        let text = text.trim();
        if text.is_empty() || text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AmoraError::Validation(format!(
                "text: Message must be between 1 and {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        let record = self.require_match(user_id).await?;

        let blocked: Vec<String> = self.repo.load_or_default(StoreKey::BlockedUsers).await;
        if blocked.iter().any(|id| id == user_id) {
            return Err(AmoraError::Authorization(
                "You have blocked this member".to_string(),
            ));
        }

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            from_me: true,
            text: text.to_string(),
            sent_at: Utc::now(),
        };

        let mut conversations = self.conversations().await;
        let thread = conversations.entry(user_id.to_string()).or_default();
        if thread.is_empty() {
            thread.extend(greeting(&record));
        }
        thread.push(message.clone());
        self.repo.save(StoreKey::ChatMessages, &conversations).await?;

        info!("message sent to {}", user_id);
        Ok(message)
    }

    async fn require_match(&self, user_id: &str) -> AmoraResult<MatchRecord> {
        let matches: Vec<MatchRecord> = self.repo.load_or_default(StoreKey::DiscoveryMatches).await;
        matches
            .into_iter()
            .find(|m| m.user_id == user_id)
            .ok_or_else(|| AmoraError::NotFound(format!("No match with {}", user_id)))
    }

    async fn conversations(&self) -> Conversations {
        self.repo.load_or_default(StoreKey::ChatMessages).await
    }
}

/// Stored messages, or the match's opening greeting when none exist yet
fn thread_or_greeting(conversations: &Conversations, record: &MatchRecord) -> Vec<ChatMessage> {
    match conversations.get(&record.user_id) {
        Some(messages) if !messages.is_empty() => messages.clone(),
        _ => greeting(record).into_iter().collect(),
    }
}

/// Opening message from a catalog match, stamped with the match time
fn greeting(record: &MatchRecord) -> Option<ChatMessage> {
    catalog::find(&record.user_id).map(|profile| ChatMessage {
        id: format!("greeting-{}", record.user_id),
        from_me: false,
        text: catalog::greeting(profile),
        sent_at: record.matched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use std::sync::Arc;

    async fn service_with_matches(ids: &[(&str, i64)]) -> (ChatService, Repository) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let now = Utc::now();
        let matches: Vec<MatchRecord> = ids
            .iter()
            .map(|(id, hours_ago)| MatchRecord {
                user_id: id.to_string(),
                matched_at: now - Duration::hours(*hours_ago),
            })
            .collect();
        repo.save(StoreKey::DiscoveryMatches, &matches).await.unwrap();
        (ChatService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_list_seeds_greetings() {
        let (chats, _) = service_with_matches(&[("1", 5), ("4", 1), ("ghost", 2)]).await;

        let list = chats.list().await;
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].user_id, "4");
        assert!(list[0].unread);
        assert!(list[0].last_message.as_deref().unwrap().contains("James"));

        let ghost = list.iter().find(|c| c.user_id == "ghost").unwrap();
        assert_eq!(ghost.name, catalog::UNKNOWN_USER);
        assert!(ghost.last_message.is_none());
    }

    #[tokio::test]
    async fn test_send_moves_chat_to_top() {
        let (chats, _) = service_with_matches(&[("1", 5), ("4", 1)]).await;

        chats.send("1", "  hi Sarah  ").await.unwrap();

        let list = chats.list().await;
        assert_eq!(list[0].user_id, "1");
        assert_eq!(list[0].last_message.as_deref(), Some("hi Sarah"));
        assert!(!list[0].unread);

        let thread = chats.thread("1").await.unwrap();
        assert_eq!(thread.len(), 2);
        assert!(!thread[0].from_me);
        assert!(thread[1].from_me);
    }

    #[tokio::test]
    async fn test_reply_keeps_greeting_in_thread() {
        let (chats, _) = service_with_matches(&[("1", 2)]).await;

        let before = chats.thread("1").await.unwrap();
        assert_eq!(before.len(), 1);
        let greeting_text = before[0].text.clone();

        chats.send("1", "hi back").await.unwrap();
        chats.send("1", "how is your week?").await.unwrap();

        let after = chats.thread("1").await.unwrap();
        let texts: Vec<(&str, bool)> = after.iter().map(|m| (m.text.as_str(), m.from_me)).collect();
        assert_eq!(
            texts,
            vec![
                (greeting_text.as_str(), false),
                ("hi back", true),
                ("how is your week?", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_reply_to_unknown_match_has_no_greeting() {
        let (chats, _) = service_with_matches(&[("ghost", 1)]).await;

        chats.send("ghost", "hello?").await.unwrap();

        let thread = chats.thread("ghost").await.unwrap();
        assert_eq!(thread.len(), 1);
        assert!(thread[0].from_me);
    }

    #[tokio::test]
    async fn test_send_rules() {
        let (chats, repo) = service_with_matches(&[("1", 1)]).await;

        assert!(matches!(chats.send("1", "   ").await, Err(AmoraError::Validation(_))));
        assert!(matches!(
            chats.send("1", &"x".repeat(MAX_MESSAGE_CHARS + 1)).await,
            Err(AmoraError::Validation(_))
        ));
        assert!(matches!(chats.send("2", "hello").await, Err(AmoraError::NotFound(_))));

        repo.push_unique_id(StoreKey::BlockedUsers, "1").await.unwrap();
        assert!(matches!(
            chats.send("1", "hello").await,
            Err(AmoraError::Authorization(_))
        ));
    }
}
