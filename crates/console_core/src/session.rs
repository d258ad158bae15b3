use std::sync::Arc;

use shared::record::Entity;
use tracing::info;
use uuid::Uuid;

use crate::{
    collaborators::{ConfirmationPrompt, DataSource, Navigator, NotificationSink},
    error::ListingError,
    mutation::MutationController,
    store::RecordStore,
    table::{TableMode, TableTarget, TableView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// One listing screen: the store it owns, its table view and the
/// collaborators that drive mutations, confirmation and navigation.
pub struct ListingSession<E: Entity> {
    store: RecordStore<E>,
    view: TableView<E>,
    mutations: MutationController<E>,
    prompt: Arc<dyn ConfirmationPrompt>,
    navigator: Arc<dyn Navigator>,
}

impl<E: Entity> ListingSession<E> {
    pub fn new(
        source: Arc<dyn DataSource<E>>,
        notifier: Arc<dyn NotificationSink>,
        prompt: Arc<dyn ConfirmationPrompt>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store: RecordStore::new(),
            view: TableView::new(),
            mutations: MutationController::new(source, notifier),
            prompt,
            navigator,
        }
    }

    pub fn store(&self) -> &RecordStore<E> {
        &self.store
    }

    pub fn view(&self) -> &TableView<E> {
        &self.view
    }

    pub fn rows(&self) -> &[E] {
        self.view.rows()
    }

    pub fn mode(&self) -> &TableMode {
        self.view.mode()
    }

    pub async fn load(&mut self) -> Result<(), ListingError> {
        let refreshed = self.store.refresh(self.mutations.source()).await;
        self.view.rederive(&self.store);
        refreshed.map(|_| ())
    }

    pub fn set_sort(&mut self, field: &str) -> Result<(), ListingError> {
        self.view.set_sort(field, &self.store)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.view.set_search(text, &self.store);
    }

    /// Enters edit mode for a listed record and returns a draft pre-filled
    /// from it.
    pub fn request_edit(&mut self, uuid: Uuid) -> Result<E::Draft, ListingError> {
        let record = self
            .store
            .find(uuid)
            .ok_or(ListingError::UnknownRecord { kind: E::KIND, uuid })?;
        let draft = record.to_draft();
        self.view.request_edit(TableTarget::of(record))?;
        Ok(draft)
    }

    /// Submits the edit in progress. A rejected payload keeps the table in
    /// edit mode; once the data source has been called the table is idle
    /// again whatever the outcome.
    pub async fn submit_edit(&mut self, draft: E::Draft) -> Result<E, ListingError> {
        let uuid = match self.view.mode() {
            TableMode::Editing { target } => target.uuid,
            _ => return Err(ListingError::NotEditing { kind: E::KIND }),
        };
        let result = self.mutations.edit(&mut self.store, uuid, draft).await;
        if !matches!(result, Err(ListingError::ValidationFailed { .. })) {
            self.view.finish();
        }
        self.view.rederive(&self.store);
        result
    }

    pub async fn create(&mut self, draft: E::Draft) -> Result<E, ListingError> {
        let result = self.mutations.create(&mut self.store, draft).await;
        self.view.rederive(&self.store);
        result
    }

    /// Asks for confirmation, then deletes. The uuid need not be in the
    /// current snapshot.
    pub async fn delete(&mut self, uuid: Uuid) -> Result<DeleteOutcome, ListingError> {
        let target = self
            .store
            .find(uuid)
            .map(TableTarget::of)
            .unwrap_or_else(|| TableTarget {
                uuid,
                name: uuid.to_string(),
            });
        let message = format!("Are you sure you want to delete {}?", target.name);
        self.view.request_delete(target)?;

        if !self.prompt.confirm(&message).await {
            self.view.cancel();
            info!(kind = %E::KIND, %uuid, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = self.mutations.delete(&mut self.store, uuid).await;
        self.view.finish();
        self.view.rederive(&self.store);
        result.map(|()| DeleteOutcome::Deleted)
    }

    pub fn cancel(&mut self) -> TableMode {
        self.view.cancel()
    }

    pub fn open_detail(&self, uuid: Uuid) {
        self.navigator.open_detail(E::KIND, uuid);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
