//! Audit record types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::workflow::types::EntityKind;

/// Kind of operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Entity created.
    Create,
    /// Entity fields updated.
    Update,
    /// Entity deleted.
    Delete,
    /// Entity status changed through the transition guard.
    StatusChange,
    /// User signed in.
    Login,
}

impl AuditAction {
    /// Returns the wire-level string for this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::StatusChange => "STATUS_CHANGE",
            Self::Login => "LOGIN",
        }
    }

    /// Parses an action from its wire-level string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "STATUS_CHANGE" => Some(Self::StatusChange),
            "LOGIN" => Some(Self::Login),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit record, ready to be persisted.
///
/// Snapshots are raw JSON of the entity before and after the mutation.
/// System actions (e.g. scheduled invoicing) have no actor.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// The acting user, if any.
    pub actor_id: Option<Uuid>,
    /// Operation kind.
    pub action: AuditAction,
    /// The entity type mutated.
    pub entity_type: EntityKind,
    /// The entity instance mutated.
    pub entity_id: Uuid,
    /// Snapshot before the mutation; `None` for creates and logins.
    pub old_value: Option<Value>,
    /// Snapshot after the mutation.
    pub new_value: Value,
    /// Request origin IP, if known.
    pub ip_address: Option<String>,
    /// Request user agent, if known.
    pub user_agent: Option<String>,
}

impl AuditEntry {
    /// Builds an entry for an entity creation.
    #[must_use]
    pub fn created(
        actor_id: Option<Uuid>,
        entity_type: EntityKind,
        entity_id: Uuid,
        new_value: Value,
    ) -> Self {
        Self {
            actor_id,
            action: AuditAction::Create,
            entity_type,
            entity_id,
            old_value: None,
            new_value,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Builds an entry for a status change.
    #[must_use]
    pub fn status_changed(
        actor_id: Option<Uuid>,
        entity_type: EntityKind,
        entity_id: Uuid,
        old_value: Value,
        new_value: Value,
    ) -> Self {
        Self {
            actor_id,
            action: AuditAction::StatusChange,
            entity_type,
            entity_id,
            old_value: Some(old_value),
            new_value,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Builds an entry for a successful sign-in.
    #[must_use]
    pub fn logged_in(user_id: Uuid, new_value: Value) -> Self {
        Self {
            actor_id: Some(user_id),
            action: AuditAction::Login,
            entity_type: EntityKind::User,
            entity_id: user_id,
            old_value: None,
            new_value,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Attaches request metadata.
    #[must_use]
    pub fn with_request_meta(
        mut self,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_round_trip() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::StatusChange,
            AuditAction::Login,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("create"), None);
    }

    #[test]
    fn test_created_entry_has_no_old_value() {
        let entry = AuditEntry::created(
            Some(Uuid::new_v4()),
            EntityKind::Order,
            Uuid::new_v4(),
            json!({"status": "DRAFT"}),
        );
        assert_eq!(entry.action, AuditAction::Create);
        assert!(entry.old_value.is_none());
    }

    #[test]
    fn test_status_change_entry() {
        let entry = AuditEntry::status_changed(
            None,
            EntityKind::Batch,
            Uuid::new_v4(),
            json!({"status": "QC_PENDING"}),
            json!({"status": "QC_PASSED"}),
        )
        .with_request_meta(Some("10.1.2.3".to_string()), None);

        assert_eq!(entry.action, AuditAction::StatusChange);
        assert!(entry.actor_id.is_none());
        assert_eq!(entry.ip_address.as_deref(), Some("10.1.2.3"));
    }
}
