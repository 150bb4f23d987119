//! In-memory session store.
//!
//! Maps conversation ids to their [`ConversationState`]. Each state sits
//! behind its own `tokio::sync::Mutex`, which is what serializes turns: the
//! engine is re-entrant per distinct state but must never see two concurrent
//! turns against the same one.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::dialogue::ConversationState;
use crate::error::SessionError;

/// A stored conversation.
#[derive(Debug)]
pub struct Session {
    pub state: Mutex<ConversationState>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: Mutex::new(ConversationState::default()),
            created_at: Utc::now(),
        }
    }
}

/// Conversation-id → state map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new conversation with default state. Returns its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Session::new());
        self.sessions.write().await.insert(id, session);
        tracing::info!(conversation_id = %id, "created conversation");
        id
    }

    /// Look up an existing conversation.
    pub async fn get(&self, id: Uuid) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Fetch `id` if given, otherwise create a fresh conversation.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> Result<(Uuid, Arc<Session>), SessionError> {
        match id {
            Some(id) => Ok((id, self.get(id).await?)),
            None => {
                let id = self.create().await;
                Ok((id, self.get(id).await?))
            }
        }
    }

    /// Reset a conversation wholesale to default state.
    pub async fn reset(&self, id: Uuid) -> Result<(), SessionError> {
        let session = self.get(id).await?;
        session.state.lock().await.reset();
        tracing::info!(conversation_id = %id, "reset conversation");
        Ok(())
    }

    /// Number of live conversations.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{Phase, ShareStage};

    #[tokio::test]
    async fn create_and_get() {
        let store = SessionStore::new();
        let id = store.create().await;
        let session = store.get(id).await.unwrap();
        assert_eq!(session.state.lock().await.phase, Phase::Intro);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let store = SessionStore::new();
        let err = store.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_or_create_makes_fresh_session_without_id() {
        let store = SessionStore::new();
        let (id, _session) = store.get_or_create(None).await.unwrap();
        let (same_id, _) = store.get_or_create(Some(id)).await.unwrap();
        assert_eq!(id, same_id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let store = SessionStore::new();
        let id = store.create().await;
        {
            let session = store.get(id).await.unwrap();
            let mut state = session.state.lock().await;
            state.phase = Phase::Share;
            state.share_stage = Some(ShareStage::AskAnother);
            state.push_user("hello");
        }
        store.reset(id).await.unwrap();

        let session = store.get(id).await.unwrap();
        let state = session.state.lock().await;
        assert_eq!(state.phase, Phase::Intro);
        assert_eq!(state.share_stage, None);
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;
        {
            let session = store.get(a).await.unwrap();
            session.state.lock().await.phase = Phase::End;
        }
        let session = store.get(b).await.unwrap();
        assert_eq!(session.state.lock().await.phase, Phase::Intro);
    }
}
