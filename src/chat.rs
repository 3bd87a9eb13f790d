use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{ChatRole, ChatSession, Message};
use crate::store::{keys, Store};

const TITLE_MAX_CHARS: usize = 30;
const DEFAULT_TITLE: &str = "新對話";

/// Persistence for chat sessions, most recent first.
#[derive(Clone)]
pub struct ChatStore {
    store: Store,
}

impl ChatStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.store.read_or_default(keys::CHAT_SESSIONS).await
    }

    /// Insert or replace by id; a new session goes to the front.
    pub async fn save_session(&self, session: ChatSession) -> Result<()> {
        let mut sessions = self.sessions().await;
        match sessions.iter().position(|s| s.id == session.id) {
            Some(index) => sessions[index] = session,
            None => sessions.insert(0, session),
        }
        self.store.put(keys::CHAT_SESSIONS, &sessions).await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let sessions: Vec<ChatSession> = self
            .sessions()
            .await
            .into_iter()
            .filter(|s| s.id != session_id)
            .collect();
        self.store.put(keys::CHAT_SESSIONS, &sessions).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store
            .put(keys::CHAT_SESSIONS, &Vec::<ChatSession>::new())
            .await
    }
}

/// A fresh, empty session with the placeholder title.
pub fn new_session() -> ChatSession {
    let now = Utc::now();
    ChatSession {
        id: Uuid::new_v4().to_string(),
        title: DEFAULT_TITLE.to_string(),
        messages: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn new_message(role: ChatRole, content: impl Into<String>) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        role,
        content: content.into(),
        timestamp: Utc::now(),
        images: None,
    }
}

/// Append a message to a session. The first user message also names the
/// session and every append refreshes `updated_at`.
pub fn append_message(session: &mut ChatSession, message: Message) {
    if session.messages.is_empty() && message.role == ChatRole::User {
        session.title = session_title(&message.content);
    }
    session.updated_at = message.timestamp;
    session.messages.push(message);
}

/// Session title derived from the first message: up to 30 characters, with
/// an ellipsis when truncated.
pub fn session_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    let title: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        format!("{title}...")
    } else {
        title
    }
}
