use std::sync::Arc;

use shared::record::Entity;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{collaborators::DataSource, error::ListingError};

/// Latest fetched snapshot of one entity kind.
///
/// The snapshot is only ever replaced wholesale. Every replacement bumps
/// `generation`, which views compare against to detect stale derived rows.
#[derive(Debug)]
pub struct RecordStore<E> {
    records: Arc<[E]>,
    generation: u64,
    stale: bool,
}

impl<E: Entity> Default for RecordStore<E> {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            generation: 0,
            stale: false,
        }
    }
}

impl<E: Entity> RecordStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn snapshot(&self) -> Arc<[E]> {
        Arc::clone(&self.records)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set when a mutation succeeded but the follow-up fetch did not.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, uuid: Uuid) -> Option<&E> {
        self.records.iter().find(|record| record.uuid() == uuid)
    }

    pub fn replace(&mut self, records: Vec<E>) -> u64 {
        self.records = Arc::from(records);
        self.generation += 1;
        self.stale = false;
        self.generation
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Fetches everything from `source`. On failure the previous snapshot
    /// stays in place.
    pub async fn refresh(&mut self, source: &dyn DataSource<E>) -> Result<u64, ListingError> {
        match source.fetch_all().await {
            Ok(records) => {
                let count = records.len();
                let generation = self.replace(records);
                info!(kind = %E::KIND, count, generation, "store: snapshot replaced");
                Ok(generation)
            }
            Err(source) => {
                warn!(kind = %E::KIND, error = %source, "store: fetch failed; keeping previous snapshot");
                Err(ListingError::FetchFailed {
                    kind: E::KIND,
                    source,
                })
            }
        }
    }
}
