use super::*;
use biodash_core::Error;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

pub struct InMemorySessionService {
    sessions: Arc<RwLock<HashMap<String, Arc<InMemorySession>>>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionService {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(session_id: &str) -> Error {
    Error::SessionError(format!("Session {} not found", session_id))
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn get(&self, session_id: &str) -> Result<Arc<dyn Session>> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .cloned()
            .map(|s| s as Arc<dyn Session>)
            .ok_or_else(|| not_found(session_id))
    }

    async fn create(&self, req: &CreateRequest) -> Result<Arc<dyn Session>> {
        let session_id = req
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let session = Arc::new(InMemorySession {
            id: session_id.clone(),
            created_at: Utc::now(),
            connection: RwLock::new(ConnectionState::Disconnected),
            page: RwLock::new(Page::default()),
        });

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(session_id, session.clone());
        tracing::debug!(session = %session.id, "Created session");

        Ok(session as Arc<dyn Session>)
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| not_found(session_id))
    }
}

pub struct InMemorySession {
    id: String,
    created_at: DateTime<Utc>,
    connection: RwLock<ConnectionState>,
    page: RwLock<Page>,
}

impl Session for InMemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn connection(&self) -> ConnectionState {
        self.connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_connection(&self, state: ConnectionState) {
        *self
            .connection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn page(&self) -> Page {
        *self.page.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_page(&self, page: Page) {
        *self.page.write().unwrap_or_else(PoisonError::into_inner) = page;
    }
}
