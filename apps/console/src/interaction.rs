//! Terminal implementations of the listing collaborators.

use std::io::Write;

use async_trait::async_trait;
use console_core::{ConfirmationPrompt, Navigator, NotificationSink};
use shared::{
    domain::{EntityKind, NotificationKind},
    protocol::Notification,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct StdinPrompt;

#[async_trait]
impl ConfirmationPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if let Err(err) = std::io::stdout().flush() {
            warn!(error = %err, "failed to flush prompt");
        }
        let mut answer = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut answer).await {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                warn!(error = %err, "failed to read confirmation; treating as no");
                false
            }
        }
    }
}

/// Used for `--yes`.
pub struct AutoApprove;

#[async_trait]
impl ConfirmationPrompt for AutoApprove {
    async fn confirm(&self, message: &str) -> bool {
        info!(%message, "confirmed by --yes");
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub struct TerminalNotifications;

impl NotificationSink for TerminalNotifications {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                info!(title = %notification.title, "{}", notification.message);
                println!("{}: {}", notification.title, notification.message);
            }
            NotificationKind::Failure => {
                error!(title = %notification.title, "{}", notification.message);
                eprintln!("{}: {}", notification.title, notification.message);
            }
        }
    }
}

pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open_detail(&self, kind: EntityKind, uuid: Uuid) {
        println!("{}", kind.detail_path(uuid));
    }
}
