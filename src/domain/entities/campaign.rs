//! Campaign tags (UTM source / medium / name) owned by a user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which campaign dimension a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignKind {
    Source,
    Medium,
    Name,
}

impl CampaignKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Medium => "medium",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for CampaignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "medium" => Ok(Self::Medium),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown campaign kind: {other}")),
        }
    }
}

/// A user-scoped campaign tag. `(user_id, kind, tag)` is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignTag {
    pub id: i64,
    pub unique_id: String,
    pub user_id: String,
    pub kind: CampaignKind,
    pub tag: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaignTag {
    pub unique_id: String,
    pub user_id: String,
    pub kind: CampaignKind,
    pub tag: String,
    pub name: String,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignTagPatch {
    pub tag: Option<String>,
    pub name: Option<String>,
}

impl CampaignTagPatch {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.name.is_none()
    }
}
