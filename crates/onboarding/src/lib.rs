//! Onboarding cases: the status workflow, attached documents and the
//! persistence-backed operations over them.

pub mod case;
pub mod document;
pub mod error;
pub mod status;
pub mod workflow;

pub use case::{Immigration, Job, OnboardingCase, OnboardingDraft, Profile, StatusChange};
pub use document::{Document, DocumentArtifact, DocumentKey, NewDocument};
pub use error::OnboardingError;
pub use status::{OnboardStatus, WorkflowState, HAPPY_PATH};
pub use workflow::{CaseStore, CaseWorkflow, MemoryCaseStore, MissingCaseStore, WorkflowError};
