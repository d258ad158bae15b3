//! Onboarding status machine.
//!
//! Forward progress moves one step at a time along [`HAPPY_PATH`]. `HOLD`
//! parks a case and remembers where it was parked from; `REINITIATED` is the
//! only way off `HOLD` apart from cancelling, and lands the case back on the
//! parked status. `ONBOARDING_COMPLETED` and `CANCELLED` accept nothing.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::OnboardingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardStatus {
    PreInitiated,
    PreInprogress,
    OnboardingInitiated,
    OnboardingInProgress,
    OnboardingCompleted,
    Hold,
    Reinitiated,
    Cancelled,
}

pub const HAPPY_PATH: [OnboardStatus; 5] = [
    OnboardStatus::PreInitiated,
    OnboardStatus::PreInprogress,
    OnboardStatus::OnboardingInitiated,
    OnboardStatus::OnboardingInProgress,
    OnboardStatus::OnboardingCompleted,
];

impl OnboardStatus {
    pub const ALL: [OnboardStatus; 8] = [
        OnboardStatus::PreInitiated,
        OnboardStatus::PreInprogress,
        OnboardStatus::OnboardingInitiated,
        OnboardStatus::OnboardingInProgress,
        OnboardStatus::OnboardingCompleted,
        OnboardStatus::Hold,
        OnboardStatus::Reinitiated,
        OnboardStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OnboardStatus::PreInitiated => "PRE_INITIATED",
            OnboardStatus::PreInprogress => "PRE_INPROGRESS",
            OnboardStatus::OnboardingInitiated => "ONBOARDING_INITIATED",
            OnboardStatus::OnboardingInProgress => "ONBOARDING_IN_PROGRESS",
            OnboardStatus::OnboardingCompleted => "ONBOARDING_COMPLETED",
            OnboardStatus::Hold => "HOLD",
            OnboardStatus::Reinitiated => "REINITIATED",
            OnboardStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OnboardStatus::OnboardingCompleted | OnboardStatus::Cancelled
        )
    }

    fn happy_path_position(self) -> Option<usize> {
        HAPPY_PATH.iter().position(|status| *status == self)
    }
}

impl fmt::Display for OnboardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardStatus {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        OnboardStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| OnboardingError::UnknownStatus(s.to_string()))
    }
}

/// Status plus the status a held case was parked from. Both fields change
/// together in [`WorkflowState::apply`] and serialize as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub onboard_status: OnboardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_from: Option<OnboardStatus>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            onboard_status: OnboardStatus::PreInitiated,
            held_from: None,
        }
    }
}

impl WorkflowState {
    pub fn status(&self) -> OnboardStatus {
        self.onboard_status
    }

    pub fn is_closed(&self) -> bool {
        self.onboard_status.is_terminal()
    }

    /// Happy-path position a case resumes from. A resting `REINITIATED`
    /// status (only ever read from external data) restarts at the beginning.
    fn position(&self) -> Option<usize> {
        match self.onboard_status {
            OnboardStatus::Reinitiated => Some(0),
            status => status.happy_path_position(),
        }
    }

    /// Every status `apply` would accept from here, in declaration order.
    pub fn legal_targets(&self) -> Vec<OnboardStatus> {
        OnboardStatus::ALL
            .into_iter()
            .filter(|target| self.apply(*target).is_ok())
            .collect()
    }

    /// Computes the state after moving to `target` without touching `self`.
    pub fn apply(&self, target: OnboardStatus) -> Result<WorkflowState, OnboardingError> {
        let from = self.onboard_status;
        let rejected = || OnboardingError::InvalidTransition { from, to: target };

        if from.is_terminal() {
            return Err(rejected());
        }

        if from == OnboardStatus::Hold {
            return match target {
                OnboardStatus::Reinitiated => Ok(WorkflowState {
                    onboard_status: self.held_from.unwrap_or(OnboardStatus::PreInitiated),
                    held_from: None,
                }),
                OnboardStatus::Cancelled => Ok(WorkflowState {
                    onboard_status: OnboardStatus::Cancelled,
                    held_from: None,
                }),
                _ => Err(rejected()),
            };
        }

        let position = self.position().ok_or_else(rejected)?;
        match target {
            OnboardStatus::Cancelled => Ok(WorkflowState {
                onboard_status: OnboardStatus::Cancelled,
                held_from: None,
            }),
            OnboardStatus::Hold => Ok(WorkflowState {
                onboard_status: OnboardStatus::Hold,
                held_from: Some(HAPPY_PATH[position]),
            }),
            _ if HAPPY_PATH.get(position + 1) == Some(&target) => Ok(WorkflowState {
                onboard_status: target,
                held_from: None,
            }),
            _ => Err(rejected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(status: OnboardStatus) -> WorkflowState {
        WorkflowState {
            onboard_status: status,
            held_from: None,
        }
    }

    #[test]
    fn pre_initiated_allows_only_next_step_hold_or_cancel() {
        assert_eq!(
            WorkflowState::default().legal_targets(),
            vec![
                OnboardStatus::PreInprogress,
                OnboardStatus::Hold,
                OnboardStatus::Cancelled
            ]
        );

        let err = WorkflowState::default()
            .apply(OnboardStatus::OnboardingInitiated)
            .expect_err("skipping a step");
        assert!(matches!(
            err,
            OnboardingError::InvalidTransition {
                from: OnboardStatus::PreInitiated,
                to: OnboardStatus::OnboardingInitiated
            }
        ));
    }

    #[test]
    fn walks_the_whole_happy_path() {
        let mut state = WorkflowState::default();
        for target in &HAPPY_PATH[1..] {
            state = state.apply(*target).expect("forward step");
        }
        assert_eq!(state.status(), OnboardStatus::OnboardingCompleted);
        assert!(state.is_closed());
    }

    #[test]
    fn backward_moves_are_rejected() {
        let state = at(OnboardStatus::OnboardingInProgress);
        for target in [
            OnboardStatus::PreInitiated,
            OnboardStatus::PreInprogress,
            OnboardStatus::OnboardingInitiated,
            OnboardStatus::OnboardingInProgress,
        ] {
            assert!(state.apply(target).is_err(), "{target} should be rejected");
        }
    }

    #[test]
    fn reinitiating_a_hold_restores_the_parked_status() {
        let held = at(OnboardStatus::OnboardingInitiated)
            .apply(OnboardStatus::Hold)
            .expect("hold");
        assert_eq!(held.held_from, Some(OnboardStatus::OnboardingInitiated));

        let resumed = held.apply(OnboardStatus::Reinitiated).expect("reinitiate");
        assert_eq!(resumed.status(), OnboardStatus::OnboardingInitiated);
        assert_eq!(resumed.held_from, None);

        let next = resumed
            .apply(OnboardStatus::OnboardingInProgress)
            .expect("resume forward");
        assert_eq!(next.status(), OnboardStatus::OnboardingInProgress);
    }

    #[test]
    fn hold_only_leads_to_reinitiated_or_cancelled() {
        let held = at(OnboardStatus::PreInprogress)
            .apply(OnboardStatus::Hold)
            .expect("hold");
        assert_eq!(
            held.legal_targets(),
            vec![OnboardStatus::Reinitiated, OnboardStatus::Cancelled]
        );
        assert!(held.apply(OnboardStatus::OnboardingInitiated).is_err());
        assert!(held.apply(OnboardStatus::Hold).is_err());
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for status in [OnboardStatus::OnboardingCompleted, OnboardStatus::Cancelled] {
            assert!(at(status).legal_targets().is_empty());
            for target in OnboardStatus::ALL {
                assert!(matches!(
                    at(status).apply(target),
                    Err(OnboardingError::InvalidTransition { .. })
                ));
            }
        }
    }

    #[test]
    fn completed_cases_cannot_be_held() {
        assert!(at(OnboardStatus::OnboardingCompleted)
            .apply(OnboardStatus::Hold)
            .is_err());
    }

    #[test]
    fn resting_reinitiated_restarts_at_the_beginning() {
        assert_eq!(
            at(OnboardStatus::Reinitiated).legal_targets(),
            vec![
                OnboardStatus::PreInprogress,
                OnboardStatus::Hold,
                OnboardStatus::Cancelled
            ]
        );
        let held = at(OnboardStatus::Reinitiated)
            .apply(OnboardStatus::Hold)
            .expect("hold");
        assert_eq!(held.held_from, Some(OnboardStatus::PreInitiated));
    }

    #[test]
    fn statuses_use_wire_names() {
        let json = serde_json::to_string(&OnboardStatus::OnboardingInProgress).expect("encode");
        assert_eq!(json, "\"ONBOARDING_IN_PROGRESS\"");
        assert_eq!(
            "pre-inprogress".parse::<OnboardStatus>().expect("parse"),
            OnboardStatus::PreInprogress
        );
        assert!("DONE".parse::<OnboardStatus>().is_err());
    }
}
