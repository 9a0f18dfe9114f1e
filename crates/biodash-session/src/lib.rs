//! Per-user session state for the dashboard
//!
//! A session remembers whether its last connect attempt succeeded and which
//! page is selected. Views can only be built from a connected session.

use async_trait::async_trait;
use biodash_core::Result;
use std::sync::Arc;

pub mod inmemory;
pub mod navigation;
pub mod types;

pub use inmemory::InMemorySessionService;
pub use navigation::{CONNECT_FAILED_MESSAGE, CONNECT_OK_MESSAGE, attempt_connect, dashboard_for};
pub use types::{ConnectionState, CreateRequest, Page, SessionInfo};

/// Session service trait
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Arc<dyn Session>>;
    async fn create(&self, req: &CreateRequest) -> Result<Arc<dyn Session>>;
    async fn delete(&self, session_id: &str) -> Result<()>;
}

/// Session trait
pub trait Session: Send + Sync {
    fn id(&self) -> &str;
    fn created_at(&self) -> chrono::DateTime<chrono::Utc>;
    fn connection(&self) -> ConnectionState;
    fn set_connection(&self, state: ConnectionState);
    fn page(&self) -> Page;
    fn set_page(&self, page: Page);

    fn info(&self) -> SessionInfo {
        let connection = self.connection();
        SessionInfo {
            id: self.id().to_string(),
            connected: connection.is_connected(),
            page: self.page(),
            connection: connection.params().cloned(),
            created_at: self.created_at(),
        }
    }
}
