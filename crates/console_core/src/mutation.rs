//! Create, edit and delete: validate, delegate, then refetch and notify.
//!
//! The store is only replaced after the data source reports success and
//! only with a fresh fetch; nothing is patched in place.

use std::sync::Arc;

use shared::{
    domain::MutationOp,
    protocol::Notification,
    record::{validate_draft, Entity},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    collaborators::{DataSource, NotificationSink},
    error::ListingError,
    store::RecordStore,
};

pub struct MutationController<E: Entity> {
    source: Arc<dyn DataSource<E>>,
    notifier: Arc<dyn NotificationSink>,
}

impl<E: Entity> MutationController<E> {
    pub fn new(source: Arc<dyn DataSource<E>>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { source, notifier }
    }

    pub fn source(&self) -> &dyn DataSource<E> {
        self.source.as_ref()
    }

    pub async fn create(
        &self,
        store: &mut RecordStore<E>,
        draft: E::Draft,
    ) -> Result<E, ListingError> {
        validate::<E>(&draft)?;
        let created = self
            .source
            .create_one(&draft)
            .await
            .map_err(|source| self.failed(MutationOp::Create, &draft_name::<E>(&draft), source))?;
        self.succeeded(store, MutationOp::Create, created.uuid(), &created.display_name())
            .await;
        Ok(created)
    }

    pub async fn edit(
        &self,
        store: &mut RecordStore<E>,
        uuid: Uuid,
        draft: E::Draft,
    ) -> Result<E, ListingError> {
        validate::<E>(&draft)?;
        let edited = self
            .source
            .edit_one(uuid, &draft)
            .await
            .map_err(|source| self.failed(MutationOp::Edit, &target_name(store, uuid), source))?;
        self.succeeded(store, MutationOp::Edit, uuid, &edited.display_name())
            .await;
        Ok(edited)
    }

    /// Deletes by uuid without checking the snapshot first; the data source
    /// decides whether the record exists.
    pub async fn delete(&self, store: &mut RecordStore<E>, uuid: Uuid) -> Result<(), ListingError> {
        let name = target_name(store, uuid);
        self.source
            .delete_one(uuid)
            .await
            .map_err(|source| self.failed(MutationOp::Delete, &name, source))?;
        self.succeeded(store, MutationOp::Delete, uuid, &name).await;
        Ok(())
    }

    async fn succeeded(&self, store: &mut RecordStore<E>, op: MutationOp, uuid: Uuid, name: &str) {
        info!(kind = %E::KIND, %op, %uuid, "mutation: succeeded");
        self.notifier.notify(Notification::success(
            format!("{} {}", E::KIND.title(), op.past_tense()),
            format!("{name} has been {} successfully.", op.past_tense().to_lowercase()),
        ));
        if let Err(err) = store.refresh(self.source.as_ref()).await {
            store.mark_stale();
            self.notifier.notify(Notification::failure(
                format!("{} list out of date", E::KIND.title()),
                err.to_string(),
            ));
        }
    }

    fn failed(&self, op: MutationOp, name: &str, source: anyhow::Error) -> ListingError {
        warn!(kind = %E::KIND, %op, error = %source, "mutation: data source rejected change");
        self.notifier.notify(Notification::failure(
            format!("Could not {op} {}", E::KIND),
            format!("{name}: {source}"),
        ));
        ListingError::MutationFailed {
            kind: E::KIND,
            op,
            source,
        }
    }
}

fn validate<E: Entity>(draft: &E::Draft) -> Result<(), ListingError> {
    let problems = validate_draft::<E>(draft);
    if problems.is_empty() {
        return Ok(());
    }
    warn!(kind = %E::KIND, problems = problems.len(), "mutation: payload rejected");
    Err(ListingError::ValidationFailed {
        kind: E::KIND,
        problems,
    })
}

fn target_name<E: Entity>(store: &RecordStore<E>, uuid: Uuid) -> String {
    store
        .find(uuid)
        .map(E::display_name)
        .unwrap_or_else(|| uuid.to_string())
}

fn draft_name<E: Entity>(draft: &E::Draft) -> String {
    E::draft_fields()
        .iter()
        .find(|field| field.required)
        .map(|field| field.text(draft).into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("new {}", E::KIND))
}

#[cfg(test)]
#[path = "tests/mutation_tests.rs"]
mod tests;
