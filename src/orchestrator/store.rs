use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::foundation::error::{AvatarError, AvatarResult};
use crate::model::job::{JobId, RenderJob};

/// Registry of job records keyed by id.
///
/// Implementations must accept concurrent inserts of distinct ids and updates of existing ones.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Add a new job; fails if the id is taken.
    async fn insert(&self, job: RenderJob) -> AvatarResult<()>;
    /// Replace the record of an existing job.
    async fn put(&self, job: RenderJob) -> AvatarResult<()>;
    /// Current record of `id`, if known.
    async fn get(&self, id: &JobId) -> AvatarResult<Option<RenderJob>>;
}

/// Process-local [`JobStore`]. Records are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, RenderJob>>,
}

impl InMemoryJobStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether no job is stored.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: RenderJob) -> AvatarResult<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(AvatarError::storage(format!("job '{}' already exists", job.id)));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn put(&self, job: RenderJob) -> AvatarResult<()> {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job;
                Ok(())
            }
            None => Err(AvatarError::storage(format!("job '{}' not found", job.id))),
        }
    }

    async fn get(&self, id: &JobId) -> AvatarResult<Option<RenderJob>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }
}
