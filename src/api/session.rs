//! Session management for the chat API
//!
//! Sessions only group turns for display; history is never sent to the model.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::rag::ChatReply;
use crate::rag::Citation;

/// Messages kept per session; older turns are dropped in pairs
const MAX_HISTORY: usize = 20;

/// One displayed message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: String, // "user" or "assistant"
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    pub timestamp: DateTime<Utc>,
}

/// Chat session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub history: Vec<SessionMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            history: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Record a question and the reply shown for it
    pub fn add_turn(&mut self, question: &str, reply: &ChatReply) {
        let now = Utc::now();
        self.history.push(SessionMessage {
            role: "user".to_string(),
            content: question.to_string(),
            citations: Vec::new(),
            timestamp: now,
        });
        self.history.push(SessionMessage {
            role: "assistant".to_string(),
            content: reply.answer.clone(),
            citations: reply.citations.clone(),
            timestamp: now,
        });
        self.last_activity = now;

        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(0..excess);
        }
    }

    #[must_use]
    pub fn is_expired(&self, timeout_secs: u64) -> bool {
        let idle = Utc::now().signed_duration_since(self.last_activity);
        idle.num_seconds() > i64::try_from(timeout_secs).unwrap_or(i64::MAX)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to one session. A turn holds the lock from retrieval until
/// its history is recorded, so turns on one session never overlap.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Session manager with automatic cleanup
pub struct SessionManager {
    sessions: Arc<DashMap<String, SessionHandle>>,
    timeout_secs: u64,
}

impl SessionManager {
    /// Create a manager and start the background cleanup task.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(session_timeout_secs: u64) -> Self {
        let manager = Self::without_cleanup(session_timeout_secs);

        let sessions = Arc::clone(&manager.sessions);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Self::cleanup_expired_sessions(&sessions, session_timeout_secs);
            }
        });

        manager
    }

    /// Create a manager without the background task
    #[must_use]
    pub fn without_cleanup(session_timeout_secs: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            timeout_secs: session_timeout_secs,
        }
    }

    #[must_use]
    pub fn create_session(&self) -> SessionHandle {
        let session = ChatSession::new();
        let id = session.session_id.clone();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&handle));
        handle
    }

    /// Live session by id; expired sessions are removed and not returned
    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<SessionHandle> {
        let handle = self
            .sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))?;
        if is_idle(&handle, self.timeout_secs) {
            self.sessions.remove(session_id);
            return None;
        }
        Some(handle)
    }

    /// Copy of a live session, waiting for any turn in progress to finish
    pub async fn snapshot(&self, session_id: &str) -> Option<ChatSession> {
        let handle = self.get_session(session_id)?;
        let session = handle.lock().await.clone();
        Some(session)
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every session idle for longer than the timeout
    pub fn cleanup_expired(&self) {
        Self::cleanup_expired_sessions(&self.sessions, self.timeout_secs);
    }

    fn cleanup_expired_sessions(sessions: &DashMap<String, SessionHandle>, timeout_secs: u64) {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|entry| is_idle(entry.value(), timeout_secs))
            .map(|entry| entry.key().clone())
            .collect();

        for session_id in expired {
            sessions.remove(&session_id);
            tracing::info!("Cleaned up expired session: {}", session_id);
        }
    }
}

/// A session locked by a running turn is never idle
fn is_idle(handle: &SessionHandle, timeout_secs: u64) -> bool {
    handle
        .try_lock()
        .is_ok_and(|session| session.is_expired(timeout_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(answer: &str) -> ChatReply {
        ChatReply {
            answer: answer.to_string(),
            citations: vec![Citation {
                name: "Source 1: acme.com (Score: 4.5)".to_string(),
                content: "Nice".to_string(),
            }],
            is_error: false,
        }
    }

    #[test]
    fn test_session_creation() {
        let session = ChatSession::new();
        assert!(session.history.is_empty());
        assert!(Uuid::parse_str(&session.session_id).is_ok());
    }

    #[test]
    fn test_add_turn() {
        let mut session = ChatSession::new();
        session.add_turn("Hello", &reply("Hi there!"));

        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].role, "user");
        assert!(session.history[0].citations.is_empty());
        assert_eq!(session.history[1].role, "assistant");
        assert_eq!(session.history[1].citations.len(), 1);
    }

    #[test]
    fn test_history_limit() {
        let mut session = ChatSession::new();
        for i in 0..15 {
            session.add_turn(&format!("Question {i}"), &reply("Answer"));
        }
        assert_eq!(session.history.len(), MAX_HISTORY);
        assert_eq!(session.history[0].content, "Question 5");
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let manager = SessionManager::without_cleanup(60);
        let stale = manager.create_session();
        let id = {
            let mut session = stale.lock().await;
            session.last_activity = Utc::now() - chrono::Duration::seconds(120);
            session.session_id.clone()
        };
        let fresh_id = manager.create_session().lock().await.session_id.clone();

        assert!(manager.get_session(&id).is_none());
        assert!(manager.snapshot(&fresh_id).await.is_some());

        manager.cleanup_expired();
        assert_eq!(manager.session_count(), 1);
    }

    #[tokio::test]
    async fn test_session_in_turn_is_not_expired() {
        let manager = SessionManager::without_cleanup(60);
        let handle = manager.create_session();
        let mut session = handle.lock().await;
        session.last_activity = Utc::now() - chrono::Duration::seconds(120);
        let id = session.session_id.clone();

        manager.cleanup_expired();
        assert_eq!(manager.session_count(), 1);
        assert!(manager.get_session(&id).is_some());

        drop(session);
        assert!(manager.get_session(&id).is_none());
        assert_eq!(manager.session_count(), 0);
    }
}
