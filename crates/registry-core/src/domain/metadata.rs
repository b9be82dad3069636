//! Persisted records of the registry.
//!
//! These are the shapes a storage engine writes and reads back. The
//! `artifact_type` field always goes through the token table, so a record
//! with an unknown token fails to decode rather than being coerced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact_type::ArtifactType;
use super::ids::{ArtifactId, GroupId, RuleId, VersionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetaData {
    pub group_id: GroupId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_on: DateTime<Utc>,
}

/// One immutable revision of an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactVersionMetaData {
    pub group_id: GroupId,
    pub artifact_id: ArtifactId,
    pub version: VersionId,

    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub created_on: DateTime<Utc>,
}

/// A configured rule (e.g. VALIDITY, COMPATIBILITY) and its raw configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub rule_id: RuleId,
    pub configuration: String,
}

/// Input for creating a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub group_id: GroupId,
    pub description: Option<String>,
}

impl NewGroup {
    pub fn new(group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: group_id.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for creating an artifact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub group_id: GroupId,
    pub artifact_id: ArtifactId,
    pub version: VersionId,
    pub artifact_type: ArtifactType,
    pub name: Option<String>,
}

impl NewVersion {
    pub fn new(
        group_id: impl Into<GroupId>,
        artifact_id: impl Into<ArtifactId>,
        version: impl Into<VersionId>,
        artifact_type: ArtifactType,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
