//! Audit trail routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use isotrack_core::audit::AuditAction;
use isotrack_core::workflow::EntityKind;
use isotrack_db::entities::audit_logs;
use isotrack_db::{AuditQuery, AuditRepository};
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the audit log router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_audit_logs))
}

/// List filters; all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsQuery {
    /// Filter by entity type.
    pub entity_type: Option<String>,
    /// Filter by entity instance.
    pub entity_id: Option<Uuid>,
    /// Filter by acting user.
    pub actor_id: Option<Uuid>,
    /// Filter by action kind.
    pub action: Option<String>,
    /// Page size; defaults to 50.
    pub limit: Option<u64>,
    /// Rows to skip.
    pub offset: Option<u64>,
}

/// GET /audit-logs - Filtered audit trail, newest first.
async fn list_audit_logs(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListAuditLogsQuery>,
) -> ApiResult<Json<Vec<audit_logs::Model>>> {
    let entity_type = query
        .entity_type
        .as_deref()
        .map(|s| {
            EntityKind::parse(s)
                .ok_or_else(|| AppError::Validation(format!("'{s}' is not a valid entity type")))
        })
        .transpose()?;
    let action = query
        .action
        .as_deref()
        .map(|s| {
            AuditAction::parse(s)
                .ok_or_else(|| AppError::Validation(format!("'{s}' is not a valid audit action")))
        })
        .transpose()?;

    let mut audit_query = AuditQuery {
        entity_type,
        entity_id: query.entity_id,
        actor_id: query.actor_id,
        action,
        ..AuditQuery::default()
    };
    if let Some(limit) = query.limit {
        audit_query.limit = limit;
    }
    if let Some(offset) = query.offset {
        audit_query.offset = offset;
    }

    let rows = AuditRepository::new((*state.db).clone())
        .list(audit_query)
        .await?;
    Ok(Json(rows))
}
