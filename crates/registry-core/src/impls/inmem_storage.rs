//! InMemoryRegistryStorage - 開発用・テスト用の RegistryStorage
//!
//! # 実装詳細
//! - group → artifact → versions の入れ子 HashMap を tokio の RwLock で保護
//! - レコードは JSON (`serde_json::Value`) として保存し、読み出し時に毎回デコードする
//!   （artifact type の token が壊れていれば Serialization エラーになる）
//! - `inject_read_faults(n)` で次の n 回の読み出しを一時的な障害にできる
//!
//! Reads are retried per [`RetryPolicy`]. When retries run out the key index
//! is checked directly: an absent key becomes the specialized not-found
//! error carrying the last fault as its cause, a present key surfaces the
//! fault itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::domain::{
    ArtifactId, ArtifactVersionMetaData, GroupId, GroupMetaData, NewGroup, NewVersion,
    NotFoundError, RegistryError, RuleConfig, RuleId, StorageFault, VersionId,
};
use crate::impls::RetryPolicy;
use crate::ports::{Clock, RegistryStorage, SystemClock};

#[derive(Default)]
struct ArtifactEntry {
    /// Creation order; the last entry is the latest version.
    versions: Vec<(VersionId, serde_json::Value)>,
}

struct GroupEntry {
    record: serde_json::Value,
    artifacts: HashMap<ArtifactId, ArtifactEntry>,
}

#[derive(Default)]
struct State {
    groups: HashMap<GroupId, GroupEntry>,
    rules: HashMap<RuleId, serde_json::Value>,
}

impl State {
    fn group(&self, group_id: &GroupId) -> Result<&GroupEntry, RegistryError> {
        self.groups
            .get(group_id)
            .ok_or_else(|| NotFoundError::group(group_id.clone()).into())
    }

    fn artifact(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
    ) -> Result<&ArtifactEntry, RegistryError> {
        self.group(group_id)?
            .artifacts
            .get(artifact_id)
            .filter(|entry| !entry.versions.is_empty())
            .ok_or_else(|| NotFoundError::artifact(group_id.clone(), artifact_id.clone()).into())
    }
}

/// In-memory implementation of [`RegistryStorage`].
pub struct InMemoryRegistryStorage<C = SystemClock> {
    state: RwLock<State>,
    clock: C,
    retry: RetryPolicy,
    read_faults: AtomicU32,
}

impl InMemoryRegistryStorage<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryRegistryStorage<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryRegistryStorage<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock,
            retry: RetryPolicy::default(),
            read_faults: AtomicU32::new(0),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Makes the next `count` read attempts fail with a transient fault.
    pub fn inject_read_faults(&self, count: u32) {
        self.read_faults.fetch_add(count, Ordering::SeqCst);
    }

    fn take_read_fault(&self, operation: &str) -> Option<StorageFault> {
        self.read_faults
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .ok()
            .map(|_| StorageFault::Transient {
                operation: operation.to_string(),
                detail: "injected read failure".to_string(),
            })
    }

    async fn read<T, F>(&self, operation: &'static str, lookup: F) -> Result<T, RegistryError>
    where
        F: Fn(&State) -> Result<T, RegistryError>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;

            let Some(fault) = self.take_read_fault(operation) else {
                let state = self.state.read().await;
                return lookup(&state).inspect_err(|err| {
                    if let RegistryError::NotFound(miss) = err {
                        tracing::debug!(operation, entity = %miss.kind(), "{miss}");
                    }
                });
            };

            if self.retry.should_retry(attempts) {
                let delay = self.retry.next_delay(attempts);
                tracing::warn!(operation, attempts, ?delay, error = %fault, "storage read failed, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            tracing::warn!(operation, attempts, error = %fault, "storage read retries exhausted");
            let state = self.state.read().await;
            return match lookup(&state) {
                Err(RegistryError::NotFound(miss)) => Err(miss.with_cause(fault).into()),
                _ => Err(fault.into()),
            };
        }
    }

    #[cfg(test)]
    async fn overwrite_version_record(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
        record: serde_json::Value,
    ) {
        let mut state = self.state.write().await;
        if let Some(entry) = state
            .groups
            .get_mut(group_id)
            .and_then(|group| group.artifacts.get_mut(artifact_id))
            && let Some(last) = entry.versions.last_mut()
        {
            last.1 = record;
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, RegistryError> {
    Ok(serde_json::to_value(value)?)
}

fn decode<T: DeserializeOwned>(record: &serde_json::Value) -> Result<T, RegistryError> {
    Ok(T::deserialize(record)?)
}

#[async_trait]
impl<C: Clock + 'static> RegistryStorage for InMemoryRegistryStorage<C> {
    async fn create_group(&self, group: NewGroup) -> Result<GroupMetaData, RegistryError> {
        let meta = GroupMetaData {
            group_id: group.group_id,
            description: group.description,
            created_on: self.clock.now(),
        };
        let record = encode(&meta)?;

        let mut state = self.state.write().await;
        match state.groups.get_mut(&meta.group_id) {
            Some(entry) => entry.record = record,
            None => {
                state.groups.insert(
                    meta.group_id.clone(),
                    GroupEntry {
                        record,
                        artifacts: HashMap::new(),
                    },
                );
            }
        }
        tracing::debug!(group_id = %meta.group_id, "group stored");
        Ok(meta)
    }

    async fn get_group(&self, group_id: &GroupId) -> Result<GroupMetaData, RegistryError> {
        self.read("get_group", |state| decode(&state.group(group_id)?.record))
            .await
    }

    async fn create_version(
        &self,
        version: NewVersion,
    ) -> Result<ArtifactVersionMetaData, RegistryError> {
        let meta = ArtifactVersionMetaData {
            group_id: version.group_id,
            artifact_id: version.artifact_id,
            version: version.version,
            artifact_type: version.artifact_type,
            name: version.name,
            created_on: self.clock.now(),
        };
        let record = encode(&meta)?;

        let mut state = self.state.write().await;
        let group = state
            .groups
            .get_mut(&meta.group_id)
            .ok_or_else(|| NotFoundError::group(meta.group_id.clone()))?;
        let entry = group.artifacts.entry(meta.artifact_id.clone()).or_default();
        match entry.versions.iter_mut().find(|(v, _)| *v == meta.version) {
            Some(existing) => existing.1 = record,
            None => entry.versions.push((meta.version.clone(), record)),
        }
        tracing::debug!(
            group_id = %meta.group_id,
            artifact_id = %meta.artifact_id,
            version = %meta.version,
            artifact_type = %meta.artifact_type,
            "version stored"
        );
        Ok(meta)
    }

    async fn get_latest_version(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
    ) -> Result<ArtifactVersionMetaData, RegistryError> {
        self.read("get_latest_version", |state| {
            let entry = state.artifact(group_id, artifact_id)?;
            match entry.versions.last() {
                Some((_, record)) => decode(record),
                None => Err(NotFoundError::artifact(group_id.clone(), artifact_id.clone()).into()),
            }
        })
        .await
    }

    async fn get_version(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
        version: &VersionId,
    ) -> Result<ArtifactVersionMetaData, RegistryError> {
        self.read("get_version", |state| {
            let entry = state.artifact(group_id, artifact_id)?;
            let (_, record) = entry
                .versions
                .iter()
                .find(|(v, _)| v == version)
                .ok_or_else(|| {
                    NotFoundError::version(group_id.clone(), artifact_id.clone(), version.clone())
                })?;
            decode(record)
        })
        .await
    }

    async fn list_versions(
        &self,
        group_id: &GroupId,
        artifact_id: &ArtifactId,
    ) -> Result<Vec<VersionId>, RegistryError> {
        self.read("list_versions", |state| {
            let entry = state.artifact(group_id, artifact_id)?;
            Ok(entry.versions.iter().map(|(v, _)| v.clone()).collect())
        })
        .await
    }

    async fn create_rule(&self, rule: RuleConfig) -> Result<(), RegistryError> {
        let record = encode(&rule)?;
        let mut state = self.state.write().await;
        state.rules.insert(rule.rule_id.clone(), record);
        tracing::debug!(rule_id = %rule.rule_id, "rule stored");
        Ok(())
    }

    async fn get_rule(&self, rule_id: &RuleId) -> Result<RuleConfig, RegistryError> {
        self.read("get_rule", |state| {
            let record = state
                .rules
                .get(rule_id)
                .ok_or_else(|| NotFoundError::rule(rule_id.clone()))?;
            decode(record)
        })
        .await
    }
}
