use ihealth_api::domain::types::MedicalRecordInput;
use ihealth_api::error::ApiError;
use ihealth_api::usecase::records::{GetMedicalRecordUseCase, UpsertMedicalRecordUseCase};
use ihealth_domain::role::Role;

use crate::helpers::{MockMedicalRecordRepo, MockUserRepo, test_user};

#[tokio::test]
async fn repeated_upsert_keeps_one_row_with_stable_id() {
    let patient = test_user(Role::Patient);
    let records = MockMedicalRecordRepo::empty();
    let usecase = UpsertMedicalRecordUseCase {
        users: MockUserRepo::new(vec![patient.clone()]),
        records: records.clone(),
    };

    let first = usecase
        .execute(
            patient.id,
            patient.id,
            MedicalRecordInput {
                medical_history: Some("asthme".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let second = usecase
        .execute(
            patient.id,
            patient.id,
            MedicalRecordInput {
                medical_history: Some("asthme".to_owned()),
                allergies: Some("arachide".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(first, second);
    let stored = records.records_handle();
    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].allergies.as_deref(), Some("arachide"));
}

#[tokio::test]
async fn doctor_can_write_any_patient_record() {
    let patient = test_user(Role::Patient);
    let doctor = test_user(Role::Doctor);
    let usecase = UpsertMedicalRecordUseCase {
        users: MockUserRepo::new(vec![patient.clone(), doctor.clone()]),
        records: MockMedicalRecordRepo::empty(),
    };

    assert!(
        usecase
            .execute(
                doctor.id,
                patient.id,
                MedicalRecordInput {
                    consultation_notes: Some("Tension stable".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn foreign_patient_cannot_touch_record() {
    let patient = test_user(Role::Patient);
    let other = test_user(Role::Patient);
    let users = MockUserRepo::new(vec![patient.clone(), other.clone()]);

    let read = GetMedicalRecordUseCase {
        users: users.clone(),
        records: MockMedicalRecordRepo::empty(),
    };
    let result = read.execute(other.id, patient.id).await;
    assert!(
        matches!(
            result,
            Err(ApiError::Forbidden("Non autorisé à accéder au dossier médical"))
        ),
        "expected Forbidden, got {result:?}"
    );

    let write = UpsertMedicalRecordUseCase {
        users,
        records: MockMedicalRecordRepo::empty(),
    };
    let result = write
        .execute(other.id, patient.id, MedicalRecordInput::default())
        .await;
    assert!(
        matches!(result, Err(ApiError::Forbidden(_))),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn absent_record_reads_as_none() {
    let patient = test_user(Role::Patient);
    let usecase = GetMedicalRecordUseCase {
        users: MockUserRepo::new(vec![patient.clone()]),
        records: MockMedicalRecordRepo::empty(),
    };

    let record = usecase.execute(patient.id, patient.id).await.unwrap();
    assert!(record.is_none());
}
