//! Registry keys (strongly-typed string keys).
//!
//! ## Phantom Type パターン
//! `Key<T>` が共通実装を持ち、`T` は実行時には使わないマーカー型として
//! コンパイル時の型安全性だけを提供します。
//! GroupId を ArtifactId の位置に渡すようなミスはコンパイルエラーになります。
//!
//! Keys are opaque: no trimming, case folding or validation happens here.
//! Whatever the caller looked up is what ends up in a not-found error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// KeyMarker は各キー型のマーカー trait
pub trait KeyMarker: Send + Sync + 'static {}

/// ジェネリックキー型
///
/// Serialized as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key<T: KeyMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: KeyMarker> Key<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T: KeyMarker> From<&str> for Key<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: KeyMarker> From<String> for Key<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: KeyMarker> AsRef<str> for Key<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T: KeyMarker> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {}

impl KeyMarker for Group {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {}

impl KeyMarker for Artifact {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {}

impl KeyMarker for Version {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {}

impl KeyMarker for Rule {}

/// Identifier of a group (namespace of artifacts).
pub type GroupId = Key<Group>;

/// Identifier of an artifact within a group.
pub type ArtifactId = Key<Artifact>;

/// Identifier of one immutable revision of an artifact.
pub type VersionId = Key<Version>;

/// Identifier of a configured rule.
pub type RuleId = Key<Rule>;
