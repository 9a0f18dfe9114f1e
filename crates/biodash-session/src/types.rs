use biodash_catalog::Role;
use biodash_core::{ConnectionParameters, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Reuse this id instead of generating one
    pub session_id: Option<String>,
}

/// Whether the last connect attempt of a session succeeded
///
/// Starts `Disconnected`. Only a connect attempt moves between the two
/// states: success enters `Connected`, failure leaves it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(ConnectionParameters),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn params(&self) -> Option<&ConnectionParameters> {
        match self {
            ConnectionState::Connected(params) => Some(params),
            ConnectionState::Disconnected => None,
        }
    }
}

/// Pages offered by the navigation selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Student,
    Researcher,
    Administrator,
    OrganismProfiles,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Student,
        Page::Researcher,
        Page::Administrator,
        Page::OrganismProfiles,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Student => "Student View",
            Page::Researcher => "Researcher View",
            Page::Administrator => "Administrator View",
            Page::OrganismProfiles => "Organism Profiles",
        }
    }

    /// Role whose catalog the page shows; the profile page has none
    pub fn role(&self) -> Option<Role> {
        match self {
            Page::Student => Some(Role::Student),
            Page::Researcher => Some(Role::Researcher),
            Page::Administrator => Some(Role::Administrator),
            Page::OrganismProfiles => None,
        }
    }
}

impl From<Role> for Page {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => Page::Student,
            Role::Researcher => Page::Researcher,
            Role::Administrator => Page::Administrator,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Page {
    type Err = Error;

    /// Accepts the selector label or a role name
    fn from_str(s: &str) -> Result<Self> {
        if let Some(page) = Page::ALL.into_iter().find(|p| p.label() == s) {
            return Ok(page);
        }
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "organism profiles" | "organisms" | "profiles" => Ok(Page::OrganismProfiles),
            other => other.parse::<Role>().map(Page::from),
        }
    }
}

/// Serializable view of a session, without the password
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub connected: bool,
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionParameters>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
