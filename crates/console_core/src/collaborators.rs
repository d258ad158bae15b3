//! Seams between the listing core and the outside world.

use anyhow::Result;
use async_trait::async_trait;
use shared::{domain::EntityKind, protocol::Notification, record::Entity};
use tracing::warn;
use uuid::Uuid;

/// Remote collection of one entity kind.
#[async_trait]
pub trait DataSource<E: Entity>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<E>>;
    async fn create_one(&self, draft: &E::Draft) -> Result<E>;
    async fn edit_one(&self, uuid: Uuid, draft: &E::Draft) -> Result<E>;
    async fn delete_one(&self, uuid: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Resolves once the user has answered; `false` means cancelled.
    async fn confirm(&self, message: &str) -> bool;
}

/// Declines everything, so destructive actions never run unattended.
pub struct MissingConfirmationPrompt;

#[async_trait]
impl ConfirmationPrompt for MissingConfirmationPrompt {
    async fn confirm(&self, message: &str) -> bool {
        warn!(%message, "no confirmation prompt configured; declining");
        false
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

pub struct DiscardNotifications;

impl NotificationSink for DiscardNotifications {
    fn notify(&self, _notification: Notification) {}
}

pub trait Navigator: Send + Sync {
    fn open_detail(&self, kind: EntityKind, uuid: Uuid);
}

pub struct MissingNavigator;

impl Navigator for MissingNavigator {
    fn open_detail(&self, kind: EntityKind, uuid: Uuid) {
        warn!(%kind, %uuid, "no navigator configured; detail view not opened");
    }
}
