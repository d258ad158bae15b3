use thiserror::Error;

use crate::{document::DocumentKey, status::OnboardStatus};

/// Rejections raised by the onboarding model. Each one leaves the case exactly
/// as it was before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("cannot move onboarding case from {from} to {to}")]
    InvalidTransition {
        from: OnboardStatus,
        to: OnboardStatus,
    },
    #[error("onboarding case is closed ({status}); documents can no longer change")]
    CaseClosed { status: OnboardStatus },
    #[error("document `{0}` does not exist on this case")]
    UnknownDocument(DocumentKey),
    #[error("document key `{0}` is already used on this case")]
    DuplicateDocumentKey(DocumentKey),
    #[error("document type is required")]
    MissingDocumentType,
    #[error("document key must not be blank")]
    BlankDocumentKey,
    #[error("unknown onboarding status `{0}`")]
    UnknownStatus(String),
    #[error("invalid document artifact: {0}")]
    InvalidArtifact(String),
}
