//! Error-to-response mapping.
//!
//! Dispatch happens on [`ErrorKind`] only. The structured keys of a
//! not-found error are copied into the body so clients never have to parse
//! the message.

use serde::{Deserialize, Serialize};

use crate::domain::{EntityKind, ErrorKind, RegistryError};

/// Class of client-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseClass {
    /// The addressed resource does not exist.
    ResourceAbsent,
    /// The request itself is malformed or fails validation.
    BadRequest,
    /// Something went wrong on the server side.
    ServerError,
}

impl ResponseClass {
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ResponseClass::ResourceAbsent,
            ErrorKind::InvalidClassification => ResponseClass::BadRequest,
            ErrorKind::Infrastructure | ErrorKind::Serialization => ResponseClass::ServerError,
        }
    }

    /// HTTP status code of this class.
    pub fn status_code(self) -> u16 {
        match self {
            ResponseClass::ResourceAbsent => 404,
            ResponseClass::BadRequest => 400,
            ResponseClass::ServerError => 500,
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub name: String,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// The rejected token of an invalid artifact type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,
}

impl ErrorResponse {
    fn bare(class: ResponseClass, name: &str, message: String) -> Self {
        Self {
            error_code: class.status_code(),
            name: name.to_string(),
            message,
            group_id: None,
            artifact_id: None,
            version: None,
            rule_id: None,
            artifact_type: None,
        }
    }

    pub fn class(&self) -> Option<ResponseClass> {
        match self.error_code {
            404 => Some(ResponseClass::ResourceAbsent),
            400 => Some(ResponseClass::BadRequest),
            500 => Some(ResponseClass::ServerError),
            _ => None,
        }
    }
}

impl From<&RegistryError> for ErrorResponse {
    fn from(err: &RegistryError) -> Self {
        let class = ResponseClass::for_kind(err.kind());
        match err {
            RegistryError::NotFound(miss) => {
                let name = match miss.kind() {
                    EntityKind::Group => "GroupNotFound",
                    EntityKind::Artifact => "ArtifactNotFound",
                    EntityKind::Version => "VersionNotFound",
                    EntityKind::Rule => "RuleNotFound",
                };
                Self {
                    group_id: miss.group_id().map(ToString::to_string),
                    artifact_id: miss.artifact_id().map(ToString::to_string),
                    version: miss.version_id().map(ToString::to_string),
                    rule_id: miss.rule_id().map(ToString::to_string),
                    ..Self::bare(class, name, miss.message())
                }
            }
            RegistryError::InvalidArtifactType(invalid) => Self {
                artifact_type: Some(invalid.token().to_string()),
                ..Self::bare(class, "InvalidArtifactType", invalid.to_string())
            },
            RegistryError::Storage(fault) => Self::bare(class, "StorageFailure", fault.to_string()),
            RegistryError::Serialization(e) => {
                Self::bare(class, "SerializationFailure", e.to_string())
            }
        }
    }
}

impl From<RegistryError> for ErrorResponse {
    fn from(err: RegistryError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactType, NotFoundError, StorageFault};
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::NotFound, ResponseClass::ResourceAbsent, 404)]
    #[case(ErrorKind::InvalidClassification, ResponseClass::BadRequest, 400)]
    #[case(ErrorKind::Infrastructure, ResponseClass::ServerError, 500)]
    #[case(ErrorKind::Serialization, ResponseClass::ServerError, 500)]
    fn kinds_map_to_classes(
        #[case] kind: ErrorKind,
        #[case] class: ResponseClass,
        #[case] status: u16,
    ) {
        assert_eq!(ResponseClass::for_kind(kind), class);
        assert_eq!(class.status_code(), status);
    }

    #[test]
    fn not_found_and_invalid_type_route_differently() {
        let not_found: RegistryError = NotFoundError::group("g1").into();
        let invalid: RegistryError = ArtifactType::parse("UNKNOWN").unwrap_err().into();

        let a = ErrorResponse::from(&not_found);
        let b = ErrorResponse::from(&invalid);

        assert_eq!(a.class(), Some(ResponseClass::ResourceAbsent));
        assert_eq!(b.class(), Some(ResponseClass::BadRequest));
        assert_ne!(a.class(), b.class());
    }

    #[test]
    fn not_found_body_carries_structured_keys() {
        let err: RegistryError = NotFoundError::version("g1", "a1", "3").into();
        let body = serde_json::to_value(ErrorResponse::from(err)).unwrap();

        assert_eq!(body["error_code"], 404);
        assert_eq!(body["name"], "VersionNotFound");
        assert_eq!(body["group_id"], "g1");
        assert_eq!(body["artifact_id"], "a1");
        assert_eq!(body["version"], "3");
        assert!(body.get("rule_id").is_none());
    }

    #[test]
    fn invalid_type_body_carries_token() {
        let err: RegistryError = ArtifactType::parse("GRAPHQL").unwrap_err().into();
        let body = ErrorResponse::from(&err);

        assert_eq!(body.error_code, 400);
        assert_eq!(body.name, "InvalidArtifactType");
        assert_eq!(body.artifact_type.as_deref(), Some("GRAPHQL"));
        assert!(body.group_id.is_none());
    }

    #[test]
    fn storage_faults_are_server_errors_even_with_not_found_wording() {
        // メッセージではなく kind で判定していることを確認
        let err: RegistryError = StorageFault::Unavailable {
            detail: "No group 'g1' was found.".to_string(),
        }
        .into();
        assert_eq!(ErrorResponse::from(&err).class(), Some(ResponseClass::ServerError));
    }
}
