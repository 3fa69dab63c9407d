//! User roles in the production and distribution organization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a user.
///
/// Roles gate approval steps and a small number of status transitions
/// (batch release requires a qualified person). There is no role
/// hierarchy: an approval step names exactly one role, and only holders
/// of that role (or an admin) may act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Customer-facing order intake.
    Sales,
    /// Plans production batches and schedules orders.
    ProductionPlanner,
    /// Runs synthesis on the production line.
    ProductionOperator,
    /// Performs quality control analysis.
    QcAnalyst,
    /// Authorized to release batches after QC passes (QP).
    QualifiedPerson,
    /// Dispatch and delivery tracking.
    Logistics,
    /// Invoicing and payment approval.
    Finance,
    /// Full administrative access.
    Admin,
}

impl UserRole {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sales" => Some(Self::Sales),
            "production_planner" => Some(Self::ProductionPlanner),
            "production_operator" => Some(Self::ProductionOperator),
            "qc_analyst" => Some(Self::QcAnalyst),
            "qualified_person" => Some(Self::QualifiedPerson),
            "logistics" => Some(Self::Logistics),
            "finance" => Some(Self::Finance),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::ProductionPlanner => "production_planner",
            Self::ProductionOperator => "production_operator",
            Self::QcAnalyst => "qc_analyst",
            Self::QualifiedPerson => "qualified_person",
            Self::Logistics => "logistics",
            Self::Finance => "finance",
            Self::Admin => "admin",
        }
    }

    /// Whether a holder of this role satisfies a requirement for `required`.
    ///
    /// Admins satisfy every role requirement; everyone else must match exactly.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        *self == Self::Admin || *self == required
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserRole::Sales)]
    #[case(UserRole::ProductionPlanner)]
    #[case(UserRole::ProductionOperator)]
    #[case(UserRole::QcAnalyst)]
    #[case(UserRole::QualifiedPerson)]
    #[case(UserRole::Logistics)]
    #[case(UserRole::Finance)]
    #[case(UserRole::Admin)]
    fn test_parse_round_trip(#[case] role: UserRole) {
        assert_eq!(UserRole::parse(role.as_str()), Some(role));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(UserRole::parse("SALES"), Some(UserRole::Sales));
        assert_eq!(
            UserRole::parse("Qualified_Person"),
            Some(UserRole::QualifiedPerson)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(UserRole::parse("superuser"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn test_satisfies_exact_match_only() {
        assert!(UserRole::Sales.satisfies(UserRole::Sales));
        assert!(!UserRole::Sales.satisfies(UserRole::Finance));
        assert!(!UserRole::QcAnalyst.satisfies(UserRole::QualifiedPerson));
    }

    #[test]
    fn test_admin_satisfies_everything() {
        assert!(UserRole::Admin.satisfies(UserRole::Sales));
        assert!(UserRole::Admin.satisfies(UserRole::QualifiedPerson));
        assert!(UserRole::Admin.satisfies(UserRole::Admin));
    }
}
