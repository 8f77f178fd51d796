use uuid::Uuid;

use ihealth_api::domain::types::{AdminStats, UserUpdate};
use ihealth_api::error::ApiError;
use ihealth_api::usecase::admin::{
    AdminCreateUserInput, AdminCreateUserUseCase, DEFAULT_SETTINGS, DeleteUserUseCase,
    GetAdminStatsUseCase, ListInvitationCodesUseCase, ListSettingsUseCase, ListUsersUseCase,
    MintInvitationCodeUseCase, UpdateSettingUseCase, UpdateUserUseCase, seed_default_settings,
};
use ihealth_domain::role::Role;

use crate::helpers::{
    MockInvitationCodeRepo, MockSettingsRepo, MockStatsRepo, MockUserRepo, test_user,
};

fn create_input(email: &str) -> AdminCreateUserInput {
    AdminCreateUserInput {
        email: Some(email.to_owned()),
        password: Some("Secret123!".to_owned()),
        role: Some("doctor".to_owned()),
        name: Some("Dr Créé".to_owned()),
        speciality: Some("Pédiatrie".to_owned()),
        ..Default::default()
    }
}

// ── Admin gate ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_admin_operation_rejects_non_admin_callers() {
    let doctor = test_user(Role::Doctor);
    let users = MockUserRepo::new(vec![doctor.clone()]);

    let forbidden = |r: &Result<_, ApiError>| {
        matches!(r, Err(ApiError::Forbidden("Accès réservé à l'administrateur")))
    };

    let stats = GetAdminStatsUseCase {
        users: users.clone(),
        stats: MockStatsRepo {
            stats: AdminStats::default(),
        },
    };
    assert!(forbidden(&stats.execute(doctor.id).await.map(|_| ())));

    let list = ListUsersUseCase {
        users: users.clone(),
    };
    assert!(forbidden(&list.execute(doctor.id).await.map(|_| ())));

    let create = AdminCreateUserUseCase {
        users: users.clone(),
    };
    assert!(forbidden(
        &create
            .execute(doctor.id, create_input("new@ihealth.sn"))
            .await
            .map(|_| ())
    ));

    let mint = MintInvitationCodeUseCase {
        users: users.clone(),
        invitations: MockInvitationCodeRepo::empty(),
    };
    assert!(forbidden(&mint.execute(doctor.id, "assistant").await.map(|_| ())));

    let settings = ListSettingsUseCase {
        users,
        settings: MockSettingsRepo::empty(),
    };
    assert!(forbidden(&settings.execute(doctor.id).await.map(|_| ())));
}

// ── GET /admin/stats ─────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_pass_through_for_admin() {
    let admin = test_user(Role::Admin);
    let expected = AdminStats {
        total_users: 12,
        patients: 8,
        doctors: 2,
        assistants: 1,
        admins: 1,
        active_users: 11,
        total_appointments: 40,
        appointments_today: 3,
        dicom_files: 7,
    };
    let usecase = GetAdminStatsUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        stats: MockStatsRepo {
            stats: expected.clone(),
        },
    };

    assert_eq!(usecase.execute(admin.id).await.unwrap(), expected);
}

// ── User management ──────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_creates_user_without_registration_gates() {
    let admin = test_user(Role::Admin);
    let users = MockUserRepo::new(vec![admin.clone()]);
    let usecase = AdminCreateUserUseCase {
        users: users.clone(),
    };

    // no phone, no birthdate, no invitation code
    let user_id = usecase
        .execute(admin.id, create_input("dr.cree@ihealth.sn"))
        .await
        .unwrap();

    let stored = users.users_handle();
    let stored = stored.lock().unwrap();
    let created = stored.iter().find(|u| u.id == user_id).unwrap();
    assert_eq!(created.role, Role::Doctor);
    assert!(created.is_active);
}

#[tokio::test]
async fn admin_create_still_validates_required_fields_and_email() {
    let admin = test_user(Role::Admin);
    let usecase = AdminCreateUserUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
    };

    let mut input = create_input("a@b.sn");
    input.name = Some("  ".to_owned());
    let result = usecase.execute(admin.id, input).await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Email, mot de passe, rôle et nom sont requis"),
        "expected Validation, got {result:?}"
    );

    let result = usecase.execute(admin.id, create_input("pas-un-email")).await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Adresse email invalide"),
        "expected Validation, got {result:?}"
    );

    let mut input = create_input("a@b.sn");
    input.role = Some("superviseur".to_owned());
    let result = usecase.execute(admin.id, input).await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Rôle invalide"),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn update_rejects_empty_patch_and_unknown_user() {
    let admin = test_user(Role::Admin);
    let target = test_user(Role::Patient);
    let users = MockUserRepo::new(vec![admin.clone(), target.clone()]);
    let usecase = UpdateUserUseCase {
        users: users.clone(),
    };

    let result = usecase
        .execute(admin.id, target.id, UserUpdate::default())
        .await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Aucune modification fournie"),
        "expected Validation, got {result:?}"
    );

    let patch = UserUpdate {
        is_active: Some(false),
        ..Default::default()
    };
    let result = usecase.execute(admin.id, Uuid::now_v7(), patch.clone()).await;
    assert!(
        matches!(result, Err(ApiError::NotFound("Utilisateur non trouvé"))),
        "expected NotFound, got {result:?}"
    );

    usecase.execute(admin.id, target.id, patch).await.unwrap();
    let stored = users.users_handle();
    let stored = stored.lock().unwrap();
    assert!(!stored.iter().find(|u| u.id == target.id).unwrap().is_active);
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let admin = test_user(Role::Admin);
    let usecase = DeleteUserUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
    };

    let result = usecase.execute(admin.id, admin.id).await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Impossible de supprimer votre propre compte"),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn delete_removes_target_and_flags_unknown_user() {
    let admin = test_user(Role::Admin);
    let target = test_user(Role::Patient);
    let users = MockUserRepo::new(vec![admin.clone(), target.clone()]);
    let usecase = DeleteUserUseCase {
        users: users.clone(),
    };

    usecase.execute(admin.id, target.id).await.unwrap();
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);

    let result = usecase.execute(admin.id, target.id).await;
    assert!(
        matches!(result, Err(ApiError::NotFound("Utilisateur non trouvé"))),
        "expected NotFound, got {result:?}"
    );
}

// ── Invitation codes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn minted_assistant_code_has_prefix_and_random_suffix() {
    let admin = test_user(Role::Admin);
    let invitations = MockInvitationCodeRepo::empty();
    let usecase = MintInvitationCodeUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        invitations: invitations.clone(),
    };

    let code = usecase.execute(admin.id, "assistant").await.unwrap();
    assert!(code.code.starts_with("ASST-"));
    assert_eq!(code.code.len(), "ASST-".len() + 8);
    assert!(!code.is_used);
    assert_eq!(code.created_by, admin.id);

    let doctor_code = usecase.execute(admin.id, "doctor").await.unwrap();
    assert!(doctor_code.code.starts_with("DR-"));

    assert_eq!(invitations.codes_handle().lock().unwrap().len(), 2);
}

#[tokio::test]
async fn patient_role_has_no_invitation_code() {
    let admin = test_user(Role::Admin);
    let usecase = MintInvitationCodeUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        invitations: MockInvitationCodeRepo::empty(),
    };

    let result = usecase.execute(admin.id, "patient").await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Rôle invalide pour un code d'invitation"),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn admin_lists_minted_codes() {
    let admin = test_user(Role::Admin);
    let invitations = MockInvitationCodeRepo::empty();
    let mint = MintInvitationCodeUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        invitations: invitations.clone(),
    };
    mint.execute(admin.id, "assistant").await.unwrap();

    let list = ListInvitationCodesUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        invitations,
    };
    assert_eq!(list.execute(admin.id).await.unwrap().len(), 1);
}

// ── System settings ──────────────────────────────────────────────────────────

#[tokio::test]
async fn seeding_is_idempotent_and_preserves_edits() {
    let settings = MockSettingsRepo::empty();
    seed_default_settings(&settings).await.unwrap();
    assert_eq!(
        settings.settings_handle().lock().unwrap().len(),
        DEFAULT_SETTINGS.len()
    );

    let admin = test_user(Role::Admin);
    let update = UpdateSettingUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        settings: settings.clone(),
    };
    update
        .execute(admin.id, "maintenance_mode", "true")
        .await
        .unwrap();

    seed_default_settings(&settings).await.unwrap();
    let stored = settings.settings_handle();
    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), DEFAULT_SETTINGS.len());
    let edited = stored.iter().find(|s| s.key == "maintenance_mode").unwrap();
    assert_eq!(edited.value, "true");
}

#[tokio::test]
async fn setting_value_must_match_declared_type() {
    let settings = MockSettingsRepo::empty();
    seed_default_settings(&settings).await.unwrap();

    let admin = test_user(Role::Admin);
    let usecase = UpdateSettingUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        settings,
    };

    let result = usecase.execute(admin.id, "maintenance_mode", "1").await;
    assert!(
        matches!(result, Err(ApiError::Validation(ref m)) if m == "Valeur invalide pour ce type de paramètre"),
        "expected Validation, got {result:?}"
    );

    let result = usecase.execute(admin.id, "max_login_attempts", "beaucoup").await;
    assert!(
        matches!(result, Err(ApiError::Validation(_))),
        "expected Validation, got {result:?}"
    );

    usecase.execute(admin.id, "max_login_attempts", "5").await.unwrap();
}

#[tokio::test]
async fn unknown_setting_key_is_not_found() {
    let settings = MockSettingsRepo::empty();
    seed_default_settings(&settings).await.unwrap();

    let admin = test_user(Role::Admin);
    let usecase = UpdateSettingUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        settings,
    };

    let result = usecase.execute(admin.id, "theme_color", "bleu").await;
    assert!(
        matches!(result, Err(ApiError::NotFound("Paramètre non trouvé"))),
        "expected NotFound, got {result:?}"
    );
}
