//! Workflow definition routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use isotrack_core::UserRole;
use isotrack_core::workflow::EntityKind;
use isotrack_db::WorkflowDefinitionRepository;
use isotrack_db::entities::{approval_steps, workflow_definitions};
use isotrack_db::repositories::workflow::{NewStep, NewWorkflow};
use isotrack_shared::error::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the workflows router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workflows", post(create_workflow))
        .route("/workflows", get(list_workflows))
        .route("/workflows/{id}", get(get_workflow))
        .route("/workflows/{id}", delete(deactivate_workflow))
}

/// One step in a workflow being created.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    /// 1-based position; orders must be contiguous.
    pub step_order: i16,
    /// Human label.
    pub label: String,
    /// Role permitted to act on this step.
    pub approver_role: String,
    /// Stored for reporting only.
    pub timeout_hours: Option<i32>,
}

/// Request body for creating a workflow definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRequest {
    /// Display name.
    pub name: String,
    /// Entity type this workflow governs.
    pub entity_type: String,
    /// Status that auto-triggers a request, if any.
    pub trigger_status: Option<String>,
    /// Whether every step must be approved.
    #[serde(default = "default_requires_all_steps")]
    pub requires_all_steps: bool,
    /// Ordered approval steps.
    pub steps: Vec<StepPayload>,
}

const fn default_requires_all_steps() -> bool {
    true
}

/// A workflow definition with its steps.
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    /// The definition row.
    #[serde(flatten)]
    pub workflow: workflow_definitions::Model,
    /// Its steps, ordered.
    pub steps: Vec<approval_steps::Model>,
}

/// List filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkflowsQuery {
    /// Restrict to one entity type.
    pub entity_type: Option<String>,
}

/// POST /workflows - Create a workflow definition with its steps.
async fn create_workflow(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateWorkflowRequest>,
) -> ApiResult<(StatusCode, Json<WorkflowResponse>)> {
    // Only admins may shape approval policy.
    if auth.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "only admins can manage workflow definitions".to_string(),
        )
        .into());
    }

    let entity_type = parse_entity_kind(&payload.entity_type)?;
    let steps = payload
        .steps
        .into_iter()
        .map(|s| {
            let approver_role = UserRole::parse(&s.approver_role).ok_or_else(|| {
                AppError::Validation(format!("'{}' is not a valid role", s.approver_role))
            })?;
            Ok(NewStep {
                step_order: s.step_order,
                label: s.label,
                approver_role,
                timeout_hours: s.timeout_hours,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let (workflow, steps) = WorkflowDefinitionRepository::new((*state.db).clone())
        .create(NewWorkflow {
            name: payload.name,
            entity_type,
            trigger_status: payload.trigger_status,
            requires_all_steps: payload.requires_all_steps,
            steps,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(WorkflowResponse { workflow, steps })))
}

/// GET /workflows - List workflow definitions.
async fn list_workflows(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListWorkflowsQuery>,
) -> ApiResult<Json<Vec<workflow_definitions::Model>>> {
    let entity_type = query
        .entity_type
        .as_deref()
        .map(parse_entity_kind)
        .transpose()?;
    let workflows = WorkflowDefinitionRepository::new((*state.db).clone())
        .list(entity_type)
        .await?;
    Ok(Json(workflows))
}

/// GET `/workflows/{id}` - Fetch a definition with its steps.
async fn get_workflow(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkflowResponse>> {
    let (workflow, steps) = WorkflowDefinitionRepository::new((*state.db).clone())
        .find_with_steps(id)
        .await?;
    Ok(Json(WorkflowResponse { workflow, steps }))
}

/// DELETE `/workflows/{id}` - Deactivate a workflow definition.
async fn deactivate_workflow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<workflow_definitions::Model>> {
    if auth.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "only admins can manage workflow definitions".to_string(),
        )
        .into());
    }
    let workflow = WorkflowDefinitionRepository::new((*state.db).clone())
        .deactivate(id)
        .await?;
    Ok(Json(workflow))
}

fn parse_entity_kind(s: &str) -> Result<EntityKind, AppError> {
    EntityKind::parse(s)
        .ok_or_else(|| AppError::Validation(format!("'{s}' is not a valid entity type")))
}
