use uuid::Uuid;

use ihealth_api::error::ApiError;
use ihealth_api::usecase::metrics::{
    AddHealthMetricInput, AddHealthMetricUseCase, DeleteHealthMetricUseCase,
    ListHealthMetricsUseCase,
};
use ihealth_domain::role::Role;

use crate::helpers::{MockHealthMetricRepo, MockUserRepo, test_metric, test_user};

// ── GET /health-metrics/{user_id} ────────────────────────────────────────────

#[tokio::test]
async fn owner_and_admin_read_metrics_foreign_user_does_not() {
    let owner = test_user(Role::Patient);
    let other = test_user(Role::Patient);
    let admin = test_user(Role::Admin);
    let usecase = ListHealthMetricsUseCase {
        users: MockUserRepo::new(vec![owner.clone(), other.clone(), admin.clone()]),
        metrics: MockHealthMetricRepo::new(vec![
            test_metric(owner.id, "weight", 72.0),
            test_metric(owner.id, "heart_rate", 64.0),
            test_metric(other.id, "weight", 80.0),
        ]),
    };

    assert_eq!(usecase.execute(owner.id, owner.id).await.unwrap().len(), 2);
    assert_eq!(usecase.execute(admin.id, owner.id).await.unwrap().len(), 2);

    let result = usecase.execute(other.id, owner.id).await;
    assert!(
        matches!(
            result,
            Err(ApiError::Forbidden("Non autorisé à voir ces données de santé"))
        ),
        "expected Forbidden, got {result:?}"
    );
}

// ── POST /health-metrics ─────────────────────────────────────────────────────

#[tokio::test]
async fn missing_fields_are_rejected() {
    let owner = test_user(Role::Patient);
    let usecase = AddHealthMetricUseCase {
        users: MockUserRepo::new(vec![owner.clone()]),
        metrics: MockHealthMetricRepo::empty(),
    };

    let result = usecase
        .execute(
            owner.id,
            AddHealthMetricInput {
                user_id: Some(owner.id),
                metric_type: Some("weight".to_owned()),
                value: None,
                notes: None,
            },
        )
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Données manquantes"),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn foreign_user_cannot_add_metric() {
    let owner = test_user(Role::Patient);
    let other = test_user(Role::Patient);
    let usecase = AddHealthMetricUseCase {
        users: MockUserRepo::new(vec![owner.clone(), other.clone()]),
        metrics: MockHealthMetricRepo::empty(),
    };

    let result = usecase
        .execute(
            other.id,
            AddHealthMetricInput {
                user_id: Some(owner.id),
                metric_type: Some("weight".to_owned()),
                value: Some(70.0),
                notes: None,
            },
        )
        .await;
    assert!(
        matches!(result, Err(ApiError::Forbidden(_))),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn owner_adds_metric() {
    let owner = test_user(Role::Patient);
    let metrics = MockHealthMetricRepo::empty();
    let usecase = AddHealthMetricUseCase {
        users: MockUserRepo::new(vec![owner.clone()]),
        metrics: metrics.clone(),
    };

    usecase
        .execute(
            owner.id,
            AddHealthMetricInput {
                user_id: Some(owner.id),
                metric_type: Some("blood_pressure".to_owned()),
                value: Some(12.8),
                notes: Some("matin".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(metrics.metrics_handle().lock().unwrap().len(), 1);
}

// ── DELETE /health-metrics/{metric_id} ───────────────────────────────────────

#[tokio::test]
async fn missing_metric_is_not_found_before_any_role_check() {
    let owner = test_user(Role::Patient);
    let usecase = DeleteHealthMetricUseCase {
        users: MockUserRepo::new(vec![owner.clone()]),
        metrics: MockHealthMetricRepo::empty(),
    };

    let result = usecase.execute(owner.id, Uuid::now_v7()).await;
    assert!(
        matches!(result, Err(ApiError::NotFound("Métrique non trouvée"))),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn foreign_delete_is_forbidden_and_row_survives() {
    let owner = test_user(Role::Patient);
    let other = test_user(Role::Patient);
    let metric = test_metric(owner.id, "weight", 70.0);
    let metrics = MockHealthMetricRepo::new(vec![metric.clone()]);
    let usecase = DeleteHealthMetricUseCase {
        users: MockUserRepo::new(vec![owner.clone(), other.clone()]),
        metrics: metrics.clone(),
    };

    let result = usecase.execute(other.id, metric.id).await;
    assert!(
        matches!(
            result,
            Err(ApiError::Forbidden("Non autorisé à supprimer cette métrique"))
        ),
        "expected Forbidden, got {result:?}"
    );
    assert_eq!(metrics.metrics_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn owner_and_admin_can_delete() {
    let owner = test_user(Role::Patient);
    let admin = test_user(Role::Admin);
    let first = test_metric(owner.id, "weight", 70.0);
    let second = test_metric(owner.id, "weight", 71.0);
    let metrics = MockHealthMetricRepo::new(vec![first.clone(), second.clone()]);
    let usecase = DeleteHealthMetricUseCase {
        users: MockUserRepo::new(vec![owner.clone(), admin.clone()]),
        metrics: metrics.clone(),
    };

    usecase.execute(owner.id, first.id).await.unwrap();
    usecase.execute(admin.id, second.id).await.unwrap();
    assert!(metrics.metrics_handle().lock().unwrap().is_empty());
}
