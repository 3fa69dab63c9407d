//! Authentication claims carried in JWT tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// The user's role (e.g. `sales`, `qualified_person`).
    pub role: String,
    /// Expiration time (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    /// Returns the user ID from the subject claim.
    ///
    /// Falls back to the nil UUID if the subject is malformed, which
    /// cannot happen for tokens issued by this service.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        Uuid::parse_str(&self.sub).unwrap_or(Uuid::nil())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "qc_analyst", Utc::now() + Duration::hours(1));
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, "qc_analyst");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_malformed_subject_yields_nil() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            role: "sales".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.user_id(), Uuid::nil());
    }
}
