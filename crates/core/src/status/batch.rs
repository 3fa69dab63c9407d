//! Production batch lifecycle statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StatusFlow;
use crate::roles::UserRole;

/// Status of a production batch.
///
/// PLANNED → SYNTHESIS → QC_PENDING → QC_PASSED → RELEASED → DISPATCHED,
/// with QC_FAILED and CANCELLED as side exits. The QC_PASSED → RELEASED
/// transition is the QP release and is gated to the qualified person role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    /// Batch planned, production slot reserved.
    Planned,
    /// Synthesis running.
    Synthesis,
    /// Awaiting QC results.
    QcPending,
    /// QC passed, awaiting QP release.
    QcPassed,
    /// QC failed; batch is not usable.
    QcFailed,
    /// Released by a qualified person.
    Released,
    /// Dispatched to customers.
    Dispatched,
    /// Cancelled before synthesis completed.
    Cancelled,
}

impl StatusFlow for BatchStatus {
    const ENTITY: &'static str = "batch";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::Synthesis => "SYNTHESIS",
            Self::QcPending => "QC_PENDING",
            Self::QcPassed => "QC_PASSED",
            Self::QcFailed => "QC_FAILED",
            Self::Released => "RELEASED",
            Self::Dispatched => "DISPATCHED",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "PLANNED" => Some(Self::Planned),
            "SYNTHESIS" => Some(Self::Synthesis),
            "QC_PENDING" => Some(Self::QcPending),
            "QC_PASSED" => Some(Self::QcPassed),
            "QC_FAILED" => Some(Self::QcFailed),
            "RELEASED" => Some(Self::Released),
            "DISPATCHED" => Some(Self::Dispatched),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Planned, Self::Synthesis | Self::Cancelled)
                | (Self::Synthesis, Self::QcPending | Self::Cancelled)
                | (Self::QcPending, Self::QcPassed | Self::QcFailed)
                | (Self::QcPassed, Self::Released)
                | (Self::Released, Self::Dispatched)
        )
    }

    fn required_role(self, to: Self) -> Option<UserRole> {
        match (self, to) {
            // QP release: only a qualified person may release a batch.
            (Self::QcPassed, Self::Released) => Some(UserRole::QualifiedPerson),
            _ => None,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BatchStatus; 8] = [
        BatchStatus::Planned,
        BatchStatus::Synthesis,
        BatchStatus::QcPending,
        BatchStatus::QcPassed,
        BatchStatus::QcFailed,
        BatchStatus::Released,
        BatchStatus::Dispatched,
        BatchStatus::Cancelled,
    ];

    #[test]
    fn test_parse_round_trip() {
        for status in ALL {
            assert_eq!(BatchStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BatchStatus::parse("planned"), None);
    }

    #[test]
    fn test_main_line() {
        assert!(BatchStatus::Planned.can_transition(BatchStatus::Synthesis));
        assert!(BatchStatus::Synthesis.can_transition(BatchStatus::QcPending));
        assert!(BatchStatus::QcPending.can_transition(BatchStatus::QcPassed));
        assert!(BatchStatus::QcPassed.can_transition(BatchStatus::Released));
        assert!(BatchStatus::Released.can_transition(BatchStatus::Dispatched));
    }

    #[test]
    fn test_qc_failure_is_terminal() {
        assert!(BatchStatus::QcPending.can_transition(BatchStatus::QcFailed));
        for to in ALL {
            assert!(!BatchStatus::QcFailed.can_transition(to), "QC_FAILED -> {to}");
        }
    }

    #[test]
    fn test_release_requires_qualified_person() {
        assert_eq!(
            BatchStatus::QcPassed.required_role(BatchStatus::Released),
            Some(UserRole::QualifiedPerson)
        );
        assert_eq!(
            BatchStatus::QcPending.required_role(BatchStatus::QcPassed),
            None
        );
    }

    #[test]
    fn test_no_release_without_qc_pass() {
        assert!(!BatchStatus::QcPending.can_transition(BatchStatus::Released));
        assert!(!BatchStatus::Synthesis.can_transition(BatchStatus::Released));
    }

    #[test]
    fn test_no_self_transitions() {
        for status in ALL {
            assert!(!status.can_transition(status), "{status}");
        }
    }
}
