//! RegistryStorage port - group / artifact / version の永続化境界
//!
//! Implementations translate their own "no row matched" into the matching
//! [`NotFoundError`](crate::domain::NotFoundError) variant. A cause is only
//! attached when the miss was inferred while recovering from a lower-level
//! failure.

use async_trait::async_trait;

use crate::domain::{
    ArtifactId, ArtifactVersionMetaData, GroupId, GroupMetaData, NewGroup, NewVersion,
    RegistryError, RuleConfig, RuleId, VersionId,
};

/// RegistryStorage は registry エンティティの正本（source of truth）
///
/// # 設計原則
/// - lookup の失敗は常に型付きの `RegistryError::NotFound` として返す（panic しない）
/// - artifact は group の下にしか存在しない。group が無ければ group の not-found を返す
/// - create は上書き（conflict の分類はここでは定義しない）
#[async_trait]
pub trait RegistryStorage: Send + Sync {
    async fn create_group(&self, group: NewGroup) -> Result<GroupMetaData, RegistryError>;

    async fn get_group(&self, group_id: &GroupId) -> Result<GroupMetaData, RegistryError>;

    /// Stores a new version. The group must already exist.
    async fn create_version(
        &self,
        version: NewVersion,
    ) -> Result<ArtifactVersionMetaData, RegistryError>;

    /// Most recently created version of an artifact.
    async fn get_latest_version(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
    ) -> Result<ArtifactVersionMetaData, RegistryError>;

    async fn get_version(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
        version: &VersionId,
    ) -> Result<ArtifactVersionMetaData, RegistryError>;

    /// Versions of an artifact in creation order.
    async fn list_versions(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
    ) -> Result<Vec<VersionId>, RegistryError>;

    async fn create_rule(&self, rule: RuleConfig) -> Result<(), RegistryError>;

    async fn get_rule(&self, rule_id: &RuleId) -> Result<RuleConfig, RegistryError>;
}
