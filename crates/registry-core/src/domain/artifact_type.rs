//! ArtifactType - artifact の content type 分類
//!
//! The token of each variant is what gets persisted and sent over the wire.
//! Tokens are append-only: a new variant may get a new token, but an
//! existing token must keep pointing at the same variant forever, otherwise
//! records written by older releases stop decoding.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Content type of a registered artifact.
///
/// The Rust variant names are free to change; [`ArtifactType::as_str`] is
/// the stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactType {
    Avro,
    Protobuff,
    Json,
    OpenApi,
    AsyncApi,
}

/// Variant ⇄ token table. Never reorder or edit existing rows.
///
/// Rows follow variant declaration order; `as_str` indexes by discriminant.
const TOKENS: [(ArtifactType, &str); 5] = [
    (ArtifactType::Avro, "AVRO"),
    (ArtifactType::Protobuff, "PROTOBUFF"),
    (ArtifactType::Json, "JSON"),
    (ArtifactType::OpenApi, "OPENAPI"),
    (ArtifactType::AsyncApi, "ASYNCAPI"),
];

impl ArtifactType {
    /// Every known variant, in token-table order.
    pub const ALL: [ArtifactType; 5] = [
        ArtifactType::Avro,
        ArtifactType::Protobuff,
        ArtifactType::Json,
        ArtifactType::OpenApi,
        ArtifactType::AsyncApi,
    ];

    /// Parses a wire/persisted token.
    ///
    /// Exact, case-sensitive match only: `"avro"` or `" AVRO"` are rejected
    /// instead of being normalized.
    pub fn parse(token: &str) -> Result<Self, InvalidArtifactType> {
        TOKENS
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(variant, _)| *variant)
            .ok_or_else(|| InvalidArtifactType::new(token))
    }

    /// The stable token of this variant.
    pub fn as_str(self) -> &'static str {
        TOKENS[self as usize].1
    }

    /// All known tokens, in token-table order.
    pub fn tokens() -> impl Iterator<Item = &'static str> {
        TOKENS.iter().map(|(_, token)| *token)
    }
}

/// A string was presented as an artifact type token but matches none.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact type '{token}'")]
pub struct InvalidArtifactType {
    token: String,
}

impl InvalidArtifactType {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The rejected input, verbatim.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = InvalidArtifactType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ArtifactType {
    type Error = InvalidArtifactType;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for ArtifactType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArtifactType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token).map_err(de::Error::custom)
    }
}
