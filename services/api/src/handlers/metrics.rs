use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::metrics::{
    AddHealthMetricInput, AddHealthMetricUseCase, DeleteHealthMetricUseCase,
    ListHealthMetricsUseCase,
};

// ── GET /health-metrics/{user_id} ────────────────────────────────────────────

#[derive(Serialize)]
pub struct MetricEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub metric_type: String,
    pub value: f64,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
}

pub async fn list_metrics(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<MetricEntry>>, ApiError> {
    let usecase = ListHealthMetricsUseCase {
        users: state.user_repo(),
        metrics: state.health_metric_repo(),
    };
    let metrics = usecase
        .execute(caller.user_id, user_id)
        .await?
        .into_iter()
        .map(|m| MetricEntry {
            id: m.id,
            user_id: m.user_id,
            metric_type: m.metric_type,
            value: m.value,
            recorded_at: m.recorded_at,
            notes: m.notes,
        })
        .collect();
    Ok(Json(metrics))
}

// ── POST /health-metrics ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AddMetricRequest {
    pub user_id: Option<Uuid>,
    pub metric_type: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct AddMetricResponse {
    pub message: &'static str,
    pub metric_id: Uuid,
}

pub async fn add_metric(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<AddMetricRequest>,
) -> Result<(StatusCode, Json<AddMetricResponse>), ApiError> {
    let usecase = AddHealthMetricUseCase {
        users: state.user_repo(),
        metrics: state.health_metric_repo(),
    };
    let metric_id = usecase
        .execute(
            caller.user_id,
            AddHealthMetricInput {
                user_id: body.user_id,
                metric_type: body.metric_type,
                value: body.value,
                notes: body.notes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AddMetricResponse {
            message: "Donnée de santé ajoutée",
            metric_id,
        }),
    ))
}

// ── DELETE /health-metrics/{metric_id} ───────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteMetricResponse {
    pub message: &'static str,
}

pub async fn delete_metric(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(metric_id): Path<Uuid>,
) -> Result<Json<DeleteMetricResponse>, ApiError> {
    let usecase = DeleteHealthMetricUseCase {
        users: state.user_repo(),
        metrics: state.health_metric_repo(),
    };
    usecase.execute(caller.user_id, metric_id).await?;
    Ok(Json(DeleteMetricResponse {
        message: "Métrique supprimée avec succès",
    }))
}
