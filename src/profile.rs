//! Profile lookup and cohort resolution
//! Personalization is best-effort: every failure here resolves to `student`

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::AwarenessConfig;
use crate::errors::{AwarenessError, Result};
use crate::Cohort;

/// Stored user profile; only `demographic` matters to the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub demographic: Option<String>,
}

impl ProfileRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            demographic: None,
        }
    }

    pub fn with_demographic(mut self, demographic: impl Into<String>) -> Self {
        self.demographic = Some(demographic.into());
        self
    }
}

/// Document store holding user profiles.
///
/// `Ok(None)` means the profile document does not exist; `Err` is any
/// transport or backend failure.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>>;
}

/// In-process profile store, used by the CLI and tests
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, profile: ProfileRecord) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }

    /// Save the learner's chosen group; unknown groups are refused
    pub async fn set_demographic(&self, user_id: &str, demographic: &str) -> Result<Cohort> {
        let cohort: Cohort = demographic.parse()?;
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| AwarenessError::ProfileNotFound {
                user_id: user_id.to_string(),
            })?;
        profile.demographic = Some(cohort.as_str().to_string());
        tracing::info!(user_id, cohort = %cohort, "demographic updated");
        Ok(cohort)
    }

    pub async fn remove(&self, user_id: &str) -> Option<ProfileRecord> {
        self.profiles.write().await.remove(user_id)
    }
}

#[async_trait]
impl ProfileLookup for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }
}

/// Maps a user id to a cohort, absorbing every lookup failure
#[derive(Clone)]
pub struct CohortResolver {
    lookup: Arc<dyn ProfileLookup>,
    timeout: Duration,
}

impl std::fmt::Debug for CohortResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohortResolver")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CohortResolver {
    pub fn new(lookup: Arc<dyn ProfileLookup>, config: &AwarenessConfig) -> Self {
        Self {
            lookup,
            timeout: config.profile_lookup_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the user's cohort; never fails
    pub async fn resolve_cohort(&self, user_id: &str) -> Cohort {
        match self.lookup_demographic(user_id).await {
            Ok(demographic) => Cohort::from_demographic(demographic.as_deref()),
            Err(err) => {
                tracing::warn!(user_id, error = %err, "profile lookup failed, using {}", Cohort::FALLBACK);
                Cohort::FALLBACK
            }
        }
    }

    async fn lookup_demographic(&self, user_id: &str) -> Result<Option<String>> {
        let profile = tokio::time::timeout(self.timeout, self.lookup.get_profile(user_id))
            .await
            .map_err(|_| AwarenessError::TimeoutError {
                operation: format!("profile lookup for {}", user_id),
            })??;

        match profile {
            Some(profile) => Ok(profile.demographic),
            None => {
                tracing::debug!(user_id, "no profile document");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLookup;

    #[async_trait]
    impl ProfileLookup for FailingLookup {
        async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
            Err(AwarenessError::ProfileLookupFailure {
                user_id: user_id.to_string(),
                message: "backend unavailable".to_string(),
            })
        }
    }

    struct SlowLookup;

    #[async_trait]
    impl ProfileLookup for SlowLookup {
        async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some(ProfileRecord::new(user_id).with_demographic("senior")))
        }
    }

    fn resolver(lookup: Arc<dyn ProfileLookup>) -> CohortResolver {
        CohortResolver::new(lookup, &AwarenessConfig::default())
    }

    #[tokio::test]
    async fn test_known_demographic_is_returned() {
        let store = Arc::new(InMemoryProfileStore::new());
        store
            .upsert(ProfileRecord::new("u1").with_demographic("rural"))
            .await;

        let resolver = resolver(store);
        assert_eq!(resolver.resolve_cohort("u1").await, Cohort::Rural);
        // same snapshot, same answer
        assert_eq!(resolver.resolve_cohort("u1").await, Cohort::Rural);
    }

    #[tokio::test]
    async fn test_missing_or_unknown_fields_fall_back() {
        let store = Arc::new(InMemoryProfileStore::new());
        store.upsert(ProfileRecord::new("blank")).await;
        store
            .upsert(ProfileRecord::new("odd").with_demographic("astronaut"))
            .await;

        let resolver = resolver(store);
        assert_eq!(resolver.resolve_cohort("blank").await, Cohort::Student);
        assert_eq!(resolver.resolve_cohort("odd").await, Cohort::Student);
        assert_eq!(resolver.resolve_cohort("nobody").await, Cohort::Student);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back() {
        let resolver = resolver(Arc::new(FailingLookup));
        assert_eq!(resolver.resolve_cohort("u1").await, Cohort::Student);
    }

    #[tokio::test]
    async fn test_lookup_timeout_falls_back() {
        let resolver = resolver(Arc::new(SlowLookup)).with_timeout(Duration::from_millis(50));
        assert_eq!(resolver.resolve_cohort("u1").await, Cohort::Student);
    }

    #[tokio::test]
    async fn test_set_demographic() {
        let store = InMemoryProfileStore::new();
        store.upsert(ProfileRecord::new("u1")).await;

        assert_eq!(store.set_demographic("u1", "senior").await.unwrap(), Cohort::Senior);
        let saved = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(saved.demographic.as_deref(), Some("senior"));

        assert!(matches!(
            store.set_demographic("u1", "pirate").await,
            Err(AwarenessError::UnknownCohort { .. })
        ));
        assert!(matches!(
            store.set_demographic("ghost", "senior").await,
            Err(AwarenessError::ProfileNotFound { .. })
        ));
        assert!(store.remove("u1").await.is_some());
    }
}
