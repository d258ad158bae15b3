use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RecordId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Vendor,
    Contact,
    Role,
    Candidate,
    Onboarding,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Client,
        EntityKind::Vendor,
        EntityKind::Contact,
        EntityKind::Role,
        EntityKind::Candidate,
        EntityKind::Onboarding,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Vendor => "vendor",
            EntityKind::Contact => "contact",
            EntityKind::Role => "role",
            EntityKind::Candidate => "candidate",
            EntityKind::Onboarding => "onboarding",
        }
    }

    /// Human title used in notifications, e.g. "Client Deleted".
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Vendor => "Vendor",
            EntityKind::Contact => "Contact",
            EntityKind::Role => "Role",
            EntityKind::Candidate => "Candidate",
            EntityKind::Onboarding => "Onboarding",
        }
    }

    /// Route segment of the detail view for this kind.
    pub fn detail_route(self) -> &'static str {
        match self {
            EntityKind::Client => "client-details",
            EntityKind::Vendor => "vendor-details",
            EntityKind::Contact => "contact-details",
            EntityKind::Role => "roles-details",
            EntityKind::Candidate => "candidate-details",
            EntityKind::Onboarding => "onboarding-details",
        }
    }

    pub fn detail_path(self, uuid: Uuid) -> String {
        format!("/{}/{uuid}", self.detail_route())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown entity kind `{0}`")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized.strip_suffix('s').unwrap_or(&normalized);
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOp {
    Create,
    Edit,
    Delete,
}

impl MutationOp {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationOp::Create => "create",
            MutationOp::Edit => "edit",
            MutationOp::Delete => "delete",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            MutationOp::Create => "Created",
            MutationOp::Edit => "Edited",
            MutationOp::Delete => "Deleted",
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
