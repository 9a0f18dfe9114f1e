use biodash_catalog::{CatalogEntry, Domain, Role};
use biodash_core::ConnectionParameters;
use biodash_session::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Connect attempt; missing fields fall back to the server's configured
/// connection defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectRequest {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl ConnectRequest {
    pub fn into_params(self, defaults: &ConnectionParameters) -> ConnectionParameters {
        ConnectionParameters {
            hostname: self.hostname.unwrap_or_else(|| defaults.hostname.clone()),
            port: self.port.unwrap_or(defaults.port),
            user: self.user.unwrap_or_else(|| defaults.user.clone()),
            password: self.password.unwrap_or_else(|| defaults.password.clone()),
            database: self.database.unwrap_or_else(|| defaults.database.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub connected: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub term: String,
}

/// Body of a role view request. `query` is the label or the short key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRequestBody {
    pub query: String,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismListResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleCatalog {
    pub role: Role,
    pub title: &'static str,
    pub queries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: Page,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub roles: Vec<RoleCatalog>,
    pub pages: Vec<PageInfo>,
    pub domains: Vec<Domain>,
}

impl CatalogResponse {
    pub fn build() -> Self {
        Self {
            roles: Role::ALL
                .into_iter()
                .map(|role| RoleCatalog {
                    role,
                    title: role.view_title(),
                    queries: role.entries().iter().map(|e| **e).collect(),
                })
                .collect(),
            pages: Page::ALL
                .into_iter()
                .map(|page| PageInfo {
                    page,
                    label: page.label(),
                })
                .collect(),
            domains: Domain::ALL.to_vec(),
        }
    }
}
