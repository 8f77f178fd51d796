//! Health metrics (weight, blood pressure, ...) recorded by users.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{HealthMetricRepository, UserRepository};
use crate::domain::types::HealthMetric;
use crate::error::ApiError;
use crate::usecase::caller_role;

// ── GET /health-metrics/{user_id} ────────────────────────────────────────────

pub struct ListHealthMetricsUseCase<U: UserRepository, H: HealthMetricRepository> {
    pub users: U,
    pub metrics: H,
}

impl<U: UserRepository, H: HealthMetricRepository> ListHealthMetricsUseCase<U, H> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<HealthMetric>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == user_id) {
            return Err(ApiError::Forbidden(
                "Non autorisé à voir ces données de santé",
            ));
        }
        self.metrics.list_for_user(user_id).await
    }
}

// ── POST /health-metrics ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AddHealthMetricInput {
    pub user_id: Option<Uuid>,
    pub metric_type: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
}

pub struct AddHealthMetricUseCase<U: UserRepository, H: HealthMetricRepository> {
    pub users: U,
    pub metrics: H,
}

impl<U: UserRepository, H: HealthMetricRepository> AddHealthMetricUseCase<U, H> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: AddHealthMetricInput,
    ) -> Result<Uuid, ApiError> {
        let metric_type = input.metric_type.filter(|t| !t.trim().is_empty());
        let (Some(user_id), Some(metric_type), Some(value)) =
            (input.user_id, metric_type, input.value)
        else {
            return Err(ApiError::validation("Données manquantes"));
        };

        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == user_id) {
            return Err(ApiError::Forbidden("Non autorisé à ajouter cette donnée"));
        }

        let metric = HealthMetric {
            id: Uuid::now_v7(),
            user_id,
            metric_type,
            value,
            recorded_at: Utc::now(),
            notes: input.notes,
        };
        self.metrics.create(&metric).await?;
        Ok(metric.id)
    }
}

// ── DELETE /health-metrics/{metric_id} ───────────────────────────────────────

pub struct DeleteHealthMetricUseCase<U: UserRepository, H: HealthMetricRepository> {
    pub users: U,
    pub metrics: H,
}

impl<U: UserRepository, H: HealthMetricRepository> DeleteHealthMetricUseCase<U, H> {
    /// Existence is checked before authorization: a missing metric is 404
    /// even for a caller who could not have deleted it.
    pub async fn execute(&self, caller_id: Uuid, metric_id: Uuid) -> Result<(), ApiError> {
        let metric = self
            .metrics
            .find_by_id(metric_id)
            .await?
            .ok_or(ApiError::NotFound("Métrique non trouvée"))?;

        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || caller_id == metric.user_id) {
            return Err(ApiError::Forbidden(
                "Non autorisé à supprimer cette métrique",
            ));
        }

        self.metrics.delete(metric_id).await?;
        Ok(())
    }
}
