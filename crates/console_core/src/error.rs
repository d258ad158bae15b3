use shared::{
    domain::{EntityKind, MutationOp},
    record::FieldProblem,
};
use thiserror::Error;
use uuid::Uuid;

/// Recoverable listing failures. None of them changes the store or the view.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("{kind} payload is invalid: {}", describe_problems(.problems))]
    ValidationFailed {
        kind: EntityKind,
        problems: Vec<FieldProblem>,
    },
    #[error("{op} {kind} failed: {source}")]
    MutationFailed {
        kind: EntityKind,
        op: MutationOp,
        source: anyhow::Error,
    },
    #[error("fetching {kind} records failed: {source}")]
    FetchFailed {
        kind: EntityKind,
        source: anyhow::Error,
    },
    #[error("{kind} has no field `{field}`")]
    UnknownField { kind: EntityKind, field: String },
    #[error("table is {current}; cannot start {requested}")]
    ViewBusy {
        current: &'static str,
        requested: &'static str,
    },
    #[error("no {kind} edit is in progress")]
    NotEditing { kind: EntityKind },
    #[error("{kind} {uuid} is not in the current listing")]
    UnknownRecord { kind: EntityKind, uuid: Uuid },
}

impl ListingError {
    pub fn problems(&self) -> &[FieldProblem] {
        match self {
            ListingError::ValidationFailed { problems, .. } => problems,
            _ => &[],
        }
    }
}

fn describe_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
