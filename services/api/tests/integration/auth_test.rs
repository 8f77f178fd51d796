use chrono::Utc;
use uuid::Uuid;

use ihealth_api::error::ApiError;
use ihealth_api::usecase::auth::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use ihealth_auth_types::token::validate_access_token;
use ihealth_domain::role::Role;

use crate::helpers::{
    MockInvitationCodeRepo, MockUserRepo, TEST_JWT_SECRET, TEST_PASSWORD, test_user,
};

fn patient_input() -> RegisterInput {
    RegisterInput {
        email: Some("aminata@ihealth.sn".to_owned()),
        password: Some(TEST_PASSWORD.to_owned()),
        role: Some("patient".to_owned()),
        name: Some("Aminata Diop".to_owned()),
        phone: Some("771234567".to_owned()),
        birthdate: Some("1990-01-01".to_owned()),
        ..Default::default()
    }
}

fn register_usecase(
    users: &MockUserRepo,
    invitations: &MockInvitationCodeRepo,
) -> RegisterUseCase<MockUserRepo, MockInvitationCodeRepo> {
    RegisterUseCase {
        users: users.clone(),
        invitations: invitations.clone(),
    }
}

// ── POST /register ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_patient_then_login() {
    let users = MockUserRepo::empty();
    let output = register_usecase(&users, &MockInvitationCodeRepo::empty())
        .execute(patient_input())
        .await
        .unwrap();

    let login = LoginUseCase {
        users: users.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = login
        .execute(LoginInput {
            email: Some("aminata@ihealth.sn".to_owned()),
            password: Some(TEST_PASSWORD.to_owned()),
        })
        .await
        .unwrap();

    assert!(!result.access_token.is_empty());
    assert_eq!(result.user.id, output.user_id);
    let info = validate_access_token(&result.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, output.user_id);
    assert_eq!(info.role, Role::Patient);

    // last_login is stamped on successful login
    let stored = users.users_handle();
    assert!(stored.lock().unwrap()[0].last_login.is_some());
}

#[tokio::test]
async fn should_reject_duplicate_email_without_second_row() {
    let users = MockUserRepo::empty();
    let invitations = MockInvitationCodeRepo::empty();
    register_usecase(&users, &invitations)
        .execute(patient_input())
        .await
        .unwrap();

    let result = register_usecase(&users, &invitations)
        .execute(patient_input())
        .await;
    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_require_core_fields() {
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(RegisterInput {
            email: Some("a@b.com".to_owned()),
            password: Some("pw".to_owned()),
            ..Default::default()
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("requis")),
        "expected required-fields validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_role() {
    let mut input = patient_input();
    input.role = Some("infirmier".to_owned());
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(input)
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Rôle invalide"),
        "expected role validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_invalid_patient_phone() {
    let mut input = patient_input();
    input.phone = Some("791234567".to_owned());
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(input)
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("téléphone")),
        "expected phone validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_future_birthdate() {
    let mut input = patient_input();
    input.birthdate = Some("2999-01-01".to_owned());
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(input)
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("passé")),
        "expected future-birthdate validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_malformed_birthdate() {
    let mut input = patient_input();
    input.birthdate = Some("01/01/1990".to_owned());
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(input)
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("YYYY-MM-DD")),
        "expected date-format validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_store_initial_medical_record_for_patient() {
    let users = MockUserRepo::empty();
    let mut input = patient_input();
    input.medical_history = Some("hypertension".to_owned());
    input.allergies = Some("pénicilline".to_owned());

    let output = register_usecase(&users, &MockInvitationCodeRepo::empty())
        .execute(input)
        .await
        .unwrap();

    let medical = users.initial_medical_handle();
    let medical = medical.lock().unwrap();
    assert_eq!(medical.len(), 1);
    assert_eq!(medical[0].0, output.user_id);
    assert_eq!(medical[0].1.medical_history.as_deref(), Some("hypertension"));
    assert_eq!(medical[0].1.allergies.as_deref(), Some("pénicilline"));
}

#[tokio::test]
async fn should_require_invitation_code_for_assistant() {
    let input = RegisterInput {
        email: Some("assistant@ihealth.sn".to_owned()),
        password: Some(TEST_PASSWORD.to_owned()),
        role: Some("assistant".to_owned()),
        name: Some("Assistant Test".to_owned()),
        ..Default::default()
    };
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(input)
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("assistants")),
        "expected missing-code validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_assistant_code_with_wrong_shape() {
    let input = RegisterInput {
        email: Some("assistant@ihealth.sn".to_owned()),
        password: Some(TEST_PASSWORD.to_owned()),
        role: Some("assistant".to_owned()),
        name: Some("Assistant Test".to_owned()),
        invitation_code: Some("DR-2026XX".to_owned()),
        ..Default::default()
    };
    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(input)
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Code d'invitation invalide"),
        "expected invalid-code validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_consume_minted_code_on_assistant_registration() {
    let code = ihealth_api::domain::types::InvitationCode {
        id: Uuid::now_v7(),
        code: "ASST-2026A".to_owned(),
        role: Role::Assistant,
        created_by: Uuid::now_v7(),
        is_used: false,
        created_at: Utc::now(),
    };
    let invitations = MockInvitationCodeRepo::new(vec![code]);

    let input = RegisterInput {
        email: Some("assistant@ihealth.sn".to_owned()),
        password: Some(TEST_PASSWORD.to_owned()),
        role: Some("assistant".to_owned()),
        name: Some("Assistant Test".to_owned()),
        invitation_code: Some("ASST-2026A".to_owned()),
        ..Default::default()
    };
    register_usecase(&MockUserRepo::empty(), &invitations)
        .execute(input)
        .await
        .unwrap();

    let codes = invitations.codes_handle();
    assert!(codes.lock().unwrap()[0].is_used);
}

#[tokio::test]
async fn should_require_doctor_fields_and_code() {
    let base = RegisterInput {
        email: Some("dr@ihealth.sn".to_owned()),
        password: Some(TEST_PASSWORD.to_owned()),
        role: Some("doctor".to_owned()),
        name: Some("Dr Test".to_owned()),
        ..Default::default()
    };

    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(RegisterInput {
            speciality: Some("Cardiologie".to_owned()),
            ..base
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("médecin")),
        "expected doctor-fields validation, got {result:?}"
    );

    let result = register_usecase(&MockUserRepo::empty(), &MockInvitationCodeRepo::empty())
        .execute(RegisterInput {
            email: Some("dr@ihealth.sn".to_owned()),
            password: Some(TEST_PASSWORD.to_owned()),
            role: Some("doctor".to_owned()),
            name: Some("Dr Test".to_owned()),
            speciality: Some("Cardiologie".to_owned()),
            license_number: Some("SN-12345".to_owned()),
            work_location: Some("Hôpital Principal".to_owned()),
            ..Default::default()
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m.contains("médecins")),
        "expected doctor-code validation, got {result:?}"
    );
}

// ── POST /login ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_login_fields() {
    let login = LoginUseCase {
        users: MockUserRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = login.execute(LoginInput::default()).await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Email et mot de passe requis"),
        "expected missing-fields validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_or_inactive_user() {
    let mut inactive = test_user(Role::Patient);
    inactive.is_active = false;
    let login = LoginUseCase {
        users: MockUserRepo::new(vec![inactive.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = login
        .execute(LoginInput {
            email: Some(inactive.email),
            password: Some(TEST_PASSWORD.to_owned()),
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::Unauthorized(_))),
        "expected Unauthorized, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let user = test_user(Role::Patient);
    let login = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = login
        .execute(LoginInput {
            email: Some(user.email),
            password: Some("mauvais-mdp".to_owned()),
        })
        .await;
    assert!(
        matches!(
            result,
            Err(ApiError::Unauthorized("Email ou mot de passe incorrect"))
        ),
        "expected wrong-password rejection, got {result:?}"
    );
}
