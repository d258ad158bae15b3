//! Listing core for the staffing console: record snapshots, search and sort,
//! the table view state machine and the create/edit/delete lifecycle.

pub mod collaborators;
pub mod engine;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod session;
pub mod store;
pub mod table;

pub use collaborators::{
    ConfirmationPrompt, DataSource, DiscardNotifications, MissingConfirmationPrompt,
    MissingNavigator, Navigator, NotificationSink,
};
pub use error::ListingError;
pub use memory::{InMemoryDataSource, SourceCall};
pub use mutation::MutationController;
pub use session::{DeleteOutcome, ListingSession};
pub use store::RecordStore;
pub use table::{TableMode, TableTarget, TableView};
