//! Support ticket lifecycle statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StatusFlow;

/// Status of a customer support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Newly opened.
    Open,
    /// Being worked on.
    InProgress,
    /// Resolution proposed.
    Resolved,
    /// Confirmed closed.
    Closed,
    /// Reopened after a resolution was contested.
    Reopened,
}

impl StatusFlow for TicketStatus {
    const ENTITY: &'static str = "support_ticket";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
            Self::Reopened => "REOPENED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "IN_PROGRESS" => Some(Self::InProgress),
            "RESOLVED" => Some(Self::Resolved),
            "CLOSED" => Some(Self::Closed),
            "REOPENED" => Some(Self::Reopened),
            _ => None,
        }
    }

    fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Resolved)
                | (Self::Resolved, Self::Closed | Self::Reopened)
                | (Self::Reopened, Self::InProgress)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(TicketStatus::Open.can_transition(TicketStatus::InProgress));
        assert!(TicketStatus::InProgress.can_transition(TicketStatus::Resolved));
        assert!(TicketStatus::Resolved.can_transition(TicketStatus::Closed));
        assert!(TicketStatus::Resolved.can_transition(TicketStatus::Reopened));
        assert!(TicketStatus::Reopened.can_transition(TicketStatus::InProgress));
        assert!(!TicketStatus::Closed.can_transition(TicketStatus::Reopened));
        assert!(!TicketStatus::Open.can_transition(TicketStatus::Resolved));
    }
}
