use shared::record::{find_field, Entity, FieldSpec};
use tracing::debug;
use uuid::Uuid;

use crate::{engine, error::ListingError, store::RecordStore};

/// The record an edit or delete is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    pub uuid: Uuid,
    pub name: String,
}

impl TableTarget {
    pub fn of<E: Entity>(record: &E) -> Self {
        Self {
            uuid: record.uuid(),
            name: record.display_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableMode {
    #[default]
    Idle,
    Editing {
        target: TableTarget,
    },
    ConfirmingDelete {
        target: TableTarget,
    },
}

impl TableMode {
    pub fn name(&self) -> &'static str {
        match self {
            TableMode::Idle => "idle",
            TableMode::Editing { .. } => "editing",
            TableMode::ConfirmingDelete { .. } => "confirming delete",
        }
    }

    pub fn target(&self) -> Option<&TableTarget> {
        match self {
            TableMode::Idle => None,
            TableMode::Editing { target } | TableMode::ConfirmingDelete { target } => Some(target),
        }
    }
}

/// Search, sort and mode state of one table, plus the rows derived from the
/// store generation it last saw.
#[derive(Debug)]
pub struct TableView<E: Entity> {
    search_text: String,
    sort_key: Option<&'static FieldSpec<E>>,
    sort_reversed: bool,
    rows: Vec<E>,
    derived_generation: Option<u64>,
    mode: TableMode,
}

impl<E: Entity> Default for TableView<E> {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_key: None,
            sort_reversed: false,
            rows: Vec::new(),
            derived_generation: None,
            mode: TableMode::Idle,
        }
    }
}

impl<E: Entity> TableView<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort_key(&self) -> Option<&'static str> {
        self.sort_key.map(|field| field.name)
    }

    pub fn sort_reversed(&self) -> bool {
        self.sort_reversed
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn mode(&self) -> &TableMode {
        &self.mode
    }

    /// True when the rows were derived from the store's current snapshot.
    pub fn is_current(&self, store: &RecordStore<E>) -> bool {
        self.derived_generation == Some(store.generation())
    }

    /// Same field flips direction; a new field sorts ascending.
    pub fn set_sort(&mut self, field: &str, store: &RecordStore<E>) -> Result<(), ListingError> {
        let spec = find_field(E::fields(), field).ok_or_else(|| ListingError::UnknownField {
            kind: E::KIND,
            field: field.to_string(),
        })?;
        if self.sort_key.is_some_and(|current| current.name == spec.name) {
            self.sort_reversed = !self.sort_reversed;
        } else {
            self.sort_key = Some(spec);
            self.sort_reversed = false;
        }
        self.rederive(store);
        Ok(())
    }

    pub fn set_search(&mut self, text: impl Into<String>, store: &RecordStore<E>) {
        self.search_text = text.into();
        self.rederive(store);
    }

    pub fn rederive(&mut self, store: &RecordStore<E>) {
        self.rows = engine::derive_view(
            store.records(),
            &self.search_text,
            self.sort_key,
            self.sort_reversed,
        );
        self.derived_generation = Some(store.generation());
        debug!(
            kind = %E::KIND,
            rows = self.rows.len(),
            generation = store.generation(),
            "table: view derived"
        );
    }

    pub fn request_edit(&mut self, target: TableTarget) -> Result<(), ListingError> {
        self.ensure_idle("edit")?;
        self.mode = TableMode::Editing { target };
        Ok(())
    }

    pub fn request_delete(&mut self, target: TableTarget) -> Result<(), ListingError> {
        self.ensure_idle("delete")?;
        self.mode = TableMode::ConfirmingDelete { target };
        Ok(())
    }

    /// Back to idle from any mode, returning the abandoned one.
    pub fn cancel(&mut self) -> TableMode {
        std::mem::take(&mut self.mode)
    }

    /// Ends an edit or delete once its mutation attempt has completed.
    /// Returns the target that was being worked on, if any.
    pub fn finish(&mut self) -> Option<TableTarget> {
        match std::mem::take(&mut self.mode) {
            TableMode::Idle => None,
            TableMode::Editing { target } | TableMode::ConfirmingDelete { target } => Some(target),
        }
    }

    fn ensure_idle(&self, requested: &'static str) -> Result<(), ListingError> {
        match self.mode {
            TableMode::Idle => Ok(()),
            ref busy => Err(ListingError::ViewBusy {
                current: busy.name(),
                requested,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
