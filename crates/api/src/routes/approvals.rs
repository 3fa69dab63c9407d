//! Approval request routes.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use isotrack_core::workflow::{ApprovalDecision, EntityKind};
use isotrack_db::ApprovalRepository;
use isotrack_db::entities::{approval_actions, approval_requests, approval_steps};
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the approvals router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/approval-requests", get(list_approval_requests))
        .route("/approval-requests/pending", get(list_pending))
        .route("/approval-requests/{id}", get(get_approval_request))
        .route("/approval-requests/{id}/actions", post(act_on_request))
}

/// Request body for an approval decision.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// The step being acted on; must be the request's current step.
    pub step_id: Uuid,
    /// APPROVED or REJECTED.
    pub decision: String,
    /// Optional reviewer comment.
    pub comment: Option<String>,
}

/// A request joined with the step the caller can act on.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    /// The pending request.
    pub request: approval_requests::Model,
    /// Its current step.
    pub current_step: approval_steps::Model,
}

/// A request with its decision history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    /// The request row.
    #[serde(flatten)]
    pub request: approval_requests::Model,
    /// Decisions applied so far, oldest first.
    pub actions: Vec<approval_actions::Model>,
}

/// List filter; both fields are required together.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    /// Entity type the requests were raised against.
    pub entity_type: String,
    /// Entity instance.
    pub entity_id: Uuid,
}

/// GET /approval-requests - List requests raised against one entity.
async fn list_approval_requests(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListRequestsQuery>,
) -> ApiResult<Json<Vec<approval_requests::Model>>> {
    let entity_type = EntityKind::parse(&query.entity_type).ok_or_else(|| {
        AppError::Validation(format!("'{}' is not a valid entity type", query.entity_type))
    })?;
    let requests = ApprovalRepository::new((*state.db).clone())
        .list_for_entity(entity_type, query.entity_id)
        .await?;
    Ok(Json(requests))
}

/// GET /approval-requests/pending - Requests awaiting the caller's role.
async fn list_pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PendingItem>>> {
    let pending = ApprovalRepository::new((*state.db).clone())
        .list_pending_for_role(auth.role)
        .await?;
    let items = pending
        .into_iter()
        .map(|(request, current_step)| PendingItem {
            request,
            current_step,
        })
        .collect();
    Ok(Json(items))
}

/// GET `/approval-requests/{id}` - Fetch a request with its actions.
async fn get_approval_request(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RequestDetail>> {
    let (request, actions) = ApprovalRepository::new((*state.db).clone())
        .find_with_actions(id)
        .await?;
    Ok(Json(RequestDetail { request, actions }))
}

/// POST `/approval-requests/{id}/actions` - Apply one approver's decision.
async fn act_on_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionRequest>,
) -> ApiResult<Json<approval_requests::Model>> {
    let decision = match payload.decision.as_str() {
        "APPROVED" => ApprovalDecision::Approved,
        "REJECTED" => ApprovalDecision::Rejected,
        other => {
            return Err(
                AppError::Validation(format!("'{other}' is not a valid decision")).into(),
            );
        }
    };

    let (request, _advancement) = ApprovalRepository::new((*state.db).clone())
        .act(
            id,
            payload.step_id,
            auth.id,
            auth.role,
            decision,
            payload.comment,
        )
        .await?;
    Ok(Json(request))
}
