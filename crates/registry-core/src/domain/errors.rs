//! Errors - エラー型と分類
//!
//! "Not found" is an expected, client-recoverable outcome of a keyed lookup,
//! not a fault. Callers tell it apart from other failures through
//! [`RegistryError::kind`], never by looking at message text.

use std::error::Error as StdError;
use std::fmt;

use super::artifact_type::InvalidArtifactType;
use super::ids::{ArtifactId, GroupId, RuleId, VersionId};

/// Boxed underlying failure attached to a not-found error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// ErrorKind は storage boundary で発生するエラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested entity does not exist under the given key.
    NotFound,
    /// A string presented as an artifact type token matched no known token.
    InvalidClassification,
    /// The storage engine itself failed (connectivity, exhausted retries, ...).
    Infrastructure,
    /// A persisted record could not be encoded or decoded.
    Serialization,
}

impl ErrorKind {
    /// Whether the caller can fix the request and try again.
    pub fn is_client_recoverable(self) -> bool {
        matches!(self, ErrorKind::NotFound | ErrorKind::InvalidClassification)
    }
}

/// Kind of registry entity a lookup was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Group,
    Artifact,
    Version,
    Rule,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Group => "group",
            EntityKind::Artifact => "artifact",
            EntityKind::Version => "version",
            EntityKind::Rule => "rule",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity that was looked up, with the key(s) that identified it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MissingEntity {
    Group {
        group_id: GroupId,
    },
    Artifact {
        group_id: GroupId,
        artifact_id: ArtifactId,
    },
    Version {
        group_id: GroupId,
        artifact_id: ArtifactId,
        version: VersionId,
    },
    Rule {
        rule_id: RuleId,
    },
}

impl MissingEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            MissingEntity::Group { .. } => EntityKind::Group,
            MissingEntity::Artifact { .. } => EntityKind::Artifact,
            MissingEntity::Version { .. } => EntityKind::Version,
            MissingEntity::Rule { .. } => EntityKind::Rule,
        }
    }
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingEntity::Group { group_id } => {
                write!(f, "No group '{group_id}' was found.")
            }
            MissingEntity::Artifact {
                group_id,
                artifact_id,
            } => write!(
                f,
                "No artifact with ID '{artifact_id}' in group '{group_id}' was found."
            ),
            MissingEntity::Version {
                group_id,
                artifact_id,
                version,
            } => write!(
                f,
                "No version '{version}' found for artifact with ID '{artifact_id}' in group '{group_id}'."
            ),
            MissingEntity::Rule { rule_id } => {
                write!(f, "No rule named '{rule_id}' was found.")
            }
        }
    }
}

/// A keyed lookup found nothing.
///
/// The message is derived from the keys, so two errors for the same entity
/// always read the same. A cause is only attached when the miss was inferred
/// while recovering from a lower-level failure; a clean negative lookup has
/// none.
#[derive(Debug, thiserror::Error)]
#[error("{entity}")]
pub struct NotFoundError {
    entity: MissingEntity,
    #[source]
    cause: Option<BoxError>,
}

impl NotFoundError {
    pub fn new(entity: MissingEntity) -> Self {
        Self {
            entity,
            cause: None,
        }
    }

    pub fn group(group_id: impl Into<GroupId>) -> Self {
        Self::new(MissingEntity::Group {
            group_id: group_id.into(),
        })
    }

    pub fn artifact(group_id: impl Into<GroupId>, artifact_id: impl Into<ArtifactId>) -> Self {
        Self::new(MissingEntity::Artifact {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        })
    }

    pub fn version(
        group_id: impl Into<GroupId>,
        artifact_id: impl Into<ArtifactId>,
        version: impl Into<VersionId>,
    ) -> Self {
        Self::new(MissingEntity::Version {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        })
    }

    pub fn rule(rule_id: impl Into<RuleId>) -> Self {
        Self::new(MissingEntity::Rule {
            rule_id: rule_id.into(),
        })
    }

    /// Chains the failure this miss was discovered through.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn entity(&self) -> &MissingEntity {
        &self.entity
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }

    pub fn message(&self) -> String {
        self.entity.to_string()
    }

    pub fn group_id(&self) -> Option<&GroupId> {
        match &self.entity {
            MissingEntity::Group { group_id }
            | MissingEntity::Artifact { group_id, .. }
            | MissingEntity::Version { group_id, .. } => Some(group_id),
            MissingEntity::Rule { .. } => None,
        }
    }

    pub fn artifact_id(&self) -> Option<&ArtifactId> {
        match &self.entity {
            MissingEntity::Artifact { artifact_id, .. }
            | MissingEntity::Version { artifact_id, .. } => Some(artifact_id),
            _ => None,
        }
    }

    pub fn version_id(&self) -> Option<&VersionId> {
        match &self.entity {
            MissingEntity::Version { version, .. } => Some(version),
            _ => None,
        }
    }

    pub fn rule_id(&self) -> Option<&RuleId> {
        match &self.entity {
            MissingEntity::Rule { rule_id } => Some(rule_id),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

/// Low-level failures reported by a storage engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageFault {
    #[error("transient failure during {operation}: {detail}")]
    Transient { operation: String, detail: String },

    #[error("storage unavailable: {detail}")]
    Unavailable { detail: String },
}

/// RegistryError は storage boundary のエラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    InvalidArtifactType(#[from] InvalidArtifactType),

    #[error(transparent)]
    Storage(#[from] StorageFault),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound(_) => ErrorKind::NotFound,
            RegistryError::InvalidArtifactType(_) => ErrorKind::InvalidClassification,
            RegistryError::Storage(_) => ErrorKind::Infrastructure,
            RegistryError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    pub fn as_not_found(&self) -> Option<&NotFoundError> {
        match self {
            RegistryError::NotFound(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArtifactType;
    use rstest::rstest;

    #[test]
    fn group_not_found_captures_key() {
        let err = NotFoundError::group("g1");
        assert_eq!(err.group_id().map(GroupId::as_str), Some("g1"));
        assert_eq!(err.kind(), EntityKind::Group);
        assert!(matches!(
            err.entity(),
            MissingEntity::Group { group_id } if group_id.as_str() == "g1"
        ));
    }

    #[test]
    fn group_not_found_message_is_deterministic() {
        let err = NotFoundError::group("g1");
        assert_eq!(err.message(), "No group 'g1' was found.");
        assert_eq!(err.to_string(), "No group 'g1' was found.");
        assert_eq!(err.message(), NotFoundError::group("g1").message());
    }

    #[rstest]
    #[case(NotFoundError::group("g1"), "No group 'g1' was found.")]
    #[case(
        NotFoundError::artifact("g1", "a1"),
        "No artifact with ID 'a1' in group 'g1' was found."
    )]
    #[case(
        NotFoundError::version("g1", "a1", "3"),
        "No version '3' found for artifact with ID 'a1' in group 'g1'."
    )]
    #[case(NotFoundError::rule("VALIDITY"), "No rule named 'VALIDITY' was found.")]
    fn messages_per_entity(#[case] err: NotFoundError, #[case] expected: &str) {
        assert_eq!(err.message(), expected);
    }

    #[test]
    fn clean_miss_has_no_cause() {
        let err = NotFoundError::group("g2");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn cause_is_chained() {
        let fault = StorageFault::Transient {
            operation: "get_group".to_string(),
            detail: "read timed out".to_string(),
        };
        let err = NotFoundError::group("g2").with_cause(fault.clone());

        assert_eq!(err.message(), "No group 'g2' was found.");
        let cause = err.cause().expect("cause attached");
        assert_eq!(cause.downcast_ref::<StorageFault>(), Some(&fault));

        // source() からも辿れること
        let source = err.source().expect("source attached");
        assert_eq!(source.to_string(), fault.to_string());
    }

    #[test]
    fn specialized_keys_are_exposed() {
        let err = NotFoundError::version("g", "a", "7");
        assert_eq!(err.group_id().map(GroupId::as_str), Some("g"));
        assert_eq!(err.artifact_id().map(ArtifactId::as_str), Some("a"));
        assert_eq!(err.version_id().map(VersionId::as_str), Some("7"));
        assert!(err.rule_id().is_none());

        let err = NotFoundError::rule("COMPATIBILITY");
        assert!(err.group_id().is_none());
        assert_eq!(err.rule_id().map(RuleId::as_str), Some("COMPATIBILITY"));
    }

    #[test]
    fn kinds_are_discriminated_structurally() {
        let not_found = RegistryError::from(NotFoundError::group("g1"));
        let invalid = RegistryError::from(ArtifactType::parse("UNKNOWN").unwrap_err());
        let storage = RegistryError::from(StorageFault::Unavailable {
            detail: "connection refused".to_string(),
        });

        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(invalid.kind(), ErrorKind::InvalidClassification);
        assert_eq!(storage.kind(), ErrorKind::Infrastructure);

        assert!(not_found.kind().is_client_recoverable());
        assert!(invalid.kind().is_client_recoverable());
        assert!(!storage.kind().is_client_recoverable());

        assert!(not_found.as_not_found().is_some());
        assert!(invalid.as_not_found().is_none());
    }

    #[test]
    fn registry_error_displays_inner_message() {
        let err = RegistryError::from(NotFoundError::artifact("g1", "a1"));
        assert_eq!(
            err.to_string(),
            "No artifact with ID 'a1' in group 'g1' was found."
        );
    }
}
