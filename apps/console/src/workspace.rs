//! JSON-file data source. The whole workspace is one document holding every
//! entity kind; each write replaces the file through a temporary sibling.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use console_core::DataSource;
use onboarding::{CaseStore, OnboardingCase};
use serde::{Deserialize, Serialize};
use shared::{
    domain::RecordId,
    entities::{Candidate, Client, Contact, Role, Vendor},
    error::ApiException,
    record::Entity,
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkspaceData {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub onboarding: Vec<OnboardingCase>,
}

/// Entity kinds stored in the workspace document.
pub trait Collection: Entity {
    fn records(data: &WorkspaceData) -> &Vec<Self>;
    fn records_mut(data: &mut WorkspaceData) -> &mut Vec<Self>;
}

macro_rules! collection {
    ($ty:ty, $field:ident) => {
        impl Collection for $ty {
            fn records(data: &WorkspaceData) -> &Vec<Self> {
                &data.$field
            }

            fn records_mut(data: &mut WorkspaceData) -> &mut Vec<Self> {
                &mut data.$field
            }
        }
    };
}

collection!(Client, clients);
collection!(Vendor, vendors);
collection!(Contact, contacts);
collection!(Role, roles);
collection!(Candidate, candidates);
collection!(OnboardingCase, onboarding);

#[derive(Clone)]
pub struct JsonWorkspace {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonWorkspace {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<WorkspaceData> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WorkspaceData::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read workspace '{}'", self.path.display()))
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("workspace '{}' is not valid JSON", self.path.display()))
    }

    async fn write(&self, data: &WorkspaceData) -> Result<()> {
        let encoded = serde_json::to_vec_pretty(data).context("failed to encode workspace")?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded)
            .await
            .with_context(|| format!("failed to write '{}'", staging.display()))?;
        if let Err(err) = fs::rename(&staging, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                warn!(path = %staging.display(), error = %cleanup, "workspace: staging file left behind");
            }
            return Err(err)
                .with_context(|| format!("failed to replace '{}'", self.path.display()));
        }
        debug!(path = %self.path.display(), "workspace: saved");
        Ok(())
    }

    /// Read-modify-write under the workspace lock. Nothing is written when
    /// `change` fails.
    async fn update<T>(&self, change: impl FnOnce(&mut WorkspaceData) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        let outcome = change(&mut data)?;
        self.write(&data).await?;
        Ok(outcome)
    }
}

fn next_id<E: Entity>(records: &[E]) -> RecordId {
    RecordId(records.iter().map(|record| record.id().0).max().unwrap_or(0) + 1)
}

fn not_found<E: Entity>(uuid: Uuid) -> ApiException {
    ApiException::not_found(format!("{} {uuid}", E::KIND))
}

#[async_trait]
impl<E: Collection> DataSource<E> for JsonWorkspace {
    async fn fetch_all(&self) -> Result<Vec<E>> {
        Ok(E::records(&self.read().await?).clone())
    }

    async fn create_one(&self, draft: &E::Draft) -> Result<E> {
        self.update(|data| {
            let records = E::records_mut(data);
            let record = E::from_draft(next_id(records), Uuid::new_v4(), draft.clone());
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    async fn edit_one(&self, uuid: Uuid, draft: &E::Draft) -> Result<E> {
        self.update(|data| {
            let record = E::records_mut(data)
                .iter_mut()
                .find(|record| record.uuid() == uuid)
                .ok_or_else(|| not_found::<E>(uuid))?;
            record.apply_draft(draft.clone());
            Ok(record.clone())
        })
        .await
    }

    async fn delete_one(&self, uuid: Uuid) -> Result<()> {
        self.update(|data| {
            let records = E::records_mut(data);
            let before = records.len();
            records.retain(|record| record.uuid() != uuid);
            if records.len() == before {
                return Err(not_found::<E>(uuid).into());
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl CaseStore for JsonWorkspace {
    async fn load_case(&self, uuid: Uuid) -> Result<Option<OnboardingCase>> {
        Ok(self
            .read()
            .await?
            .onboarding
            .into_iter()
            .find(|case| case.uuid == uuid))
    }

    async fn save_case(&self, case: &OnboardingCase) -> Result<()> {
        self.update(|data| {
            match data.onboarding.iter_mut().find(|stored| stored.uuid == case.uuid) {
                Some(stored) => *stored = case.clone(),
                None => data.onboarding.push(case.clone()),
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "tests/workspace_tests.rs"]
mod tests;
