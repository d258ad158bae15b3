//! Process-local data source, used for fixtures and as a test double.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::RecordId,
    error::{ApiException, ErrorCode},
    record::Entity,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::collaborators::DataSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    FetchAll,
    Create,
    Edit(Uuid),
    Delete(Uuid),
}

struct MemoryState<E> {
    records: Vec<E>,
    next_id: i64,
    calls: Vec<SourceCall>,
    fail_next: Option<ApiException>,
}

#[derive(Clone)]
pub struct InMemoryDataSource<E> {
    state: Arc<Mutex<MemoryState<E>>>,
}

impl<E: Entity> Default for InMemoryDataSource<E> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<E: Entity> InMemoryDataSource<E> {
    pub fn with_records(records: Vec<E>) -> Self {
        let next_id = records.iter().map(|record| record.id().0).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                records,
                next_id,
                calls: Vec::new(),
                fail_next: None,
            })),
        }
    }

    pub async fn records(&self) -> Vec<E> {
        self.state.lock().await.records.clone()
    }

    pub async fn calls(&self) -> Vec<SourceCall> {
        self.state.lock().await.calls.clone()
    }

    /// Makes the next call (of any kind) fail with `Unavailable`.
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().await.fail_next =
            Some(ApiException::new(ErrorCode::Unavailable, message));
    }

    async fn begin(&self, call: SourceCall) -> Result<tokio::sync::MutexGuard<'_, MemoryState<E>>> {
        let mut state = self.state.lock().await;
        state.calls.push(call);
        if let Some(err) = state.fail_next.take() {
            return Err(err.into());
        }
        Ok(state)
    }
}

#[async_trait]
impl<E: Entity> DataSource<E> for InMemoryDataSource<E> {
    async fn fetch_all(&self) -> Result<Vec<E>> {
        let state = self.begin(SourceCall::FetchAll).await?;
        Ok(state.records.clone())
    }

    async fn create_one(&self, draft: &E::Draft) -> Result<E> {
        let mut state = self.begin(SourceCall::Create).await?;
        let record = E::from_draft(RecordId(state.next_id), Uuid::new_v4(), draft.clone());
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    async fn edit_one(&self, uuid: Uuid, draft: &E::Draft) -> Result<E> {
        let mut state = self.begin(SourceCall::Edit(uuid)).await?;
        let record = state
            .records
            .iter_mut()
            .find(|record| record.uuid() == uuid)
            .ok_or_else(|| ApiException::not_found(format!("{} {uuid}", E::KIND)))?;
        record.apply_draft(draft.clone());
        Ok(record.clone())
    }

    async fn delete_one(&self, uuid: Uuid) -> Result<()> {
        let mut state = self.begin(SourceCall::Delete(uuid)).await?;
        let before = state.records.len();
        state.records.retain(|record| record.uuid() != uuid);
        if state.records.len() == before {
            return Err(ApiException::not_found(format!("{} {uuid}", E::KIND)).into());
        }
        Ok(())
    }
}
