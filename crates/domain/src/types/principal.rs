//! Users and teams that own availability

use serde::{Deserialize, Serialize};

/// A set of member principals whose availability is intersected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub member_ids: Vec<String>,
}

/// A user or a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Principal {
    User { id: String },
    Team(Team),
}

impl Principal {
    pub fn user(id: impl Into<String>) -> Self {
        Self::User { id: id.into() }
    }

    pub fn team(id: impl Into<String>, member_ids: Vec<String>) -> Self {
        Self::Team(Team { id: id.into(), member_ids })
    }

    pub fn id(&self) -> &str {
        match self {
            Self::User { id } => id,
            Self::Team(team) => &team.id,
        }
    }

    pub fn is_team(&self) -> bool {
        matches!(self, Self::Team(_))
    }
}
