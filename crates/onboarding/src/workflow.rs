//! Persistence-backed onboarding operations.
//!
//! Every operation loads the case, applies the change to a copy and saves the
//! whole case back. A rejected change or a failed save leaves the stored case
//! untouched. Operations through one workflow run one at a time; writers in
//! other processes are not coordinated.

use std::{collections::HashMap, sync::Arc};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    case::{OnboardingCase, StatusChange},
    document::{Document, DocumentArtifact, DocumentKey, NewDocument},
    error::OnboardingError,
    status::OnboardStatus,
};

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn load_case(&self, uuid: Uuid) -> Result<Option<OnboardingCase>>;
    async fn save_case(&self, case: &OnboardingCase) -> Result<()>;
}

pub struct MissingCaseStore;

#[async_trait]
impl CaseStore for MissingCaseStore {
    async fn load_case(&self, uuid: Uuid) -> Result<Option<OnboardingCase>> {
        Err(anyhow!("onboarding case store unavailable; cannot load {uuid}"))
    }

    async fn save_case(&self, case: &OnboardingCase) -> Result<()> {
        Err(anyhow!(
            "onboarding case store unavailable; cannot save {}",
            case.uuid
        ))
    }
}

/// Process-local case store keyed by uuid.
#[derive(Clone, Default)]
pub struct MemoryCaseStore {
    cases: Arc<Mutex<HashMap<Uuid, OnboardingCase>>>,
}

impl MemoryCaseStore {
    pub fn with_cases(cases: impl IntoIterator<Item = OnboardingCase>) -> Self {
        Self {
            cases: Arc::new(Mutex::new(
                cases.into_iter().map(|case| (case.uuid, case)).collect(),
            )),
        }
    }
}

#[async_trait]
impl CaseStore for MemoryCaseStore {
    async fn load_case(&self, uuid: Uuid) -> Result<Option<OnboardingCase>> {
        Ok(self.cases.lock().await.get(&uuid).cloned())
    }

    async fn save_case(&self, case: &OnboardingCase) -> Result<()> {
        self.cases.lock().await.insert(case.uuid, case.clone());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Rejected(#[from] OnboardingError),
    #[error("onboarding case {0} not found")]
    NotFound(Uuid),
    #[error("onboarding case store failed: {0}")]
    Store(#[source] anyhow::Error),
}

pub struct CaseWorkflow<S> {
    store: S,
    actor: String,
    updates: Mutex<()>,
}

impl<S: CaseStore> CaseWorkflow<S> {
    pub fn new(store: S, actor: impl Into<String>) -> Self {
        Self {
            store,
            actor: actor.into(),
            updates: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn case(&self, uuid: Uuid) -> Result<OnboardingCase, WorkflowError> {
        self.store
            .load_case(uuid)
            .await
            .map_err(WorkflowError::Store)?
            .ok_or(WorkflowError::NotFound(uuid))
    }

    pub async fn transition(
        &self,
        uuid: Uuid,
        target: OnboardStatus,
    ) -> Result<StatusChange, WorkflowError> {
        let change = self
            .update(uuid, |case, actor| {
                case.transition(target, actor, Utc::now())
            })
            .await?;
        info!(
            case = %uuid,
            from = %change.from,
            to = %change.to,
            "onboarding: status changed"
        );
        Ok(change)
    }

    pub async fn add_document(
        &self,
        uuid: Uuid,
        document: NewDocument,
    ) -> Result<DocumentKey, WorkflowError> {
        let key = self
            .update(uuid, |case, actor| {
                case.add_document(document, actor, Utc::now())
            })
            .await?;
        info!(case = %uuid, document = %key, "onboarding: document attached");
        Ok(key)
    }

    pub async fn rename_document(
        &self,
        uuid: Uuid,
        key: &DocumentKey,
        name: Option<String>,
    ) -> Result<(), WorkflowError> {
        self.update(uuid, |case, actor| {
            case.rename_document(key, name, actor, Utc::now())
        })
        .await
    }

    pub async fn retype_document(
        &self,
        uuid: Uuid,
        key: &DocumentKey,
        document_type: String,
    ) -> Result<(), WorkflowError> {
        self.update(uuid, |case, actor| {
            case.retype_document(key, document_type, actor, Utc::now())
        })
        .await
    }

    pub async fn replace_artifact(
        &self,
        uuid: Uuid,
        key: &DocumentKey,
        file: Option<DocumentArtifact>,
    ) -> Result<(), WorkflowError> {
        self.update(uuid, |case, actor| {
            case.replace_artifact(key, file, actor, Utc::now())
        })
        .await
    }

    pub async fn remove_document(
        &self,
        uuid: Uuid,
        key: &DocumentKey,
    ) -> Result<Document, WorkflowError> {
        let removed = self
            .update(uuid, |case, actor| case.remove_document(key, actor, Utc::now()))
            .await?;
        info!(case = %uuid, document = %key, "onboarding: document removed");
        Ok(removed)
    }

    async fn update<T>(
        &self,
        uuid: Uuid,
        change: impl FnOnce(&mut OnboardingCase, &str) -> Result<T, OnboardingError>,
    ) -> Result<T, WorkflowError> {
        // Held from load to save so concurrent changes are not lost.
        let _update = self.updates.lock().await;
        let mut case = self.case(uuid).await?;
        let outcome = change(&mut case, &self.actor).map_err(|err| {
            warn!(case = %uuid, error = %err, "onboarding: change rejected");
            WorkflowError::Rejected(err)
        })?;
        self.store.save_case(&case).await.map_err(|err| {
            warn!(case = %uuid, error = %err, "onboarding: failed to save case");
            WorkflowError::Store(err)
        })?;
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
