//! Admin surface: stats, user management, invitation codes, settings.

use chrono::Utc;
use rand::{RngExt as _, distr::Alphanumeric};
use uuid::Uuid;

use ihealth_domain::role::Role;
use ihealth_domain::validate::{invitation_prefix, is_valid_email};

use crate::domain::repository::{
    InvitationCodeRepository, SettingsRepository, StatsRepository, UserRepository,
};
use crate::domain::types::{
    AdminStats, InvitationCode, SettingType, SystemSetting, User, UserUpdate,
};
use crate::error::ApiError;
use crate::infra::password::hash_password;
use crate::usecase::caller_role;

const ADMIN_ONLY: &str = "Accès réservé à l'administrateur";
const CODE_SUFFIX_LEN: usize = 8;

async fn require_admin<U: UserRepository>(users: &U, caller_id: Uuid) -> Result<(), ApiError> {
    if caller_role(users, caller_id).await?.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(ADMIN_ONLY))
    }
}

// ── GET /admin/stats ─────────────────────────────────────────────────────────

pub struct GetAdminStatsUseCase<U: UserRepository, S: StatsRepository> {
    pub users: U,
    pub stats: S,
}

impl<U: UserRepository, S: StatsRepository> GetAdminStatsUseCase<U, S> {
    pub async fn execute(&self, caller_id: Uuid) -> Result<AdminStats, ApiError> {
        require_admin(&self.users, caller_id).await?;
        self.stats.collect().await
    }
}

// ── GET /admin/users ─────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, caller_id: Uuid) -> Result<Vec<User>, ApiError> {
        require_admin(&self.users, caller_id).await?;
        self.users.list_all().await
    }
}

// ── POST /admin/users ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AdminCreateUserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
}

pub struct AdminCreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> AdminCreateUserUseCase<U> {
    /// Direct account creation. Skips the self-registration gates (invitation
    /// code, patient phone/birthdate) — the admin vouches for the account.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: AdminCreateUserInput,
    ) -> Result<Uuid, ApiError> {
        require_admin(&self.users, caller_id).await?;

        let filled = |v: Option<String>| v.filter(|s: &String| !s.trim().is_empty());
        let (Some(email), Some(password), Some(role), Some(name)) = (
            filled(input.email),
            filled(input.password),
            filled(input.role),
            filled(input.name),
        ) else {
            return Err(ApiError::validation(
                "Email, mot de passe, rôle et nom sont requis",
            ));
        };
        let role = Role::from_str(&role).ok_or_else(|| ApiError::validation("Rôle invalide"))?;
        if !is_valid_email(&email) {
            return Err(ApiError::validation("Adresse email invalide"));
        }

        let user = User {
            id: Uuid::now_v7(),
            password_hash: hash_password(&password)?,
            email,
            role,
            name,
            phone: filled(input.phone),
            birthdate: None,
            speciality: filled(input.speciality),
            license_number: filled(input.license_number),
            work_location: filled(input.work_location),
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        };
        self.users.create(&user, None).await?;
        Ok(user.id)
    }
}

// ── PATCH /admin/users/{id} ──────────────────────────────────────────────────

pub struct UpdateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateUserUseCase<U> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        user_id: Uuid,
        update: UserUpdate,
    ) -> Result<(), ApiError> {
        require_admin(&self.users, caller_id).await?;
        if update.is_empty() {
            return Err(ApiError::validation("Aucune modification fournie"));
        }
        if self.users.update_profile(user_id, &update).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound("Utilisateur non trouvé"))
        }
    }
}

// ── DELETE /admin/users/{id} ─────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, caller_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        require_admin(&self.users, caller_id).await?;
        if caller_id == user_id {
            return Err(ApiError::validation(
                "Impossible de supprimer votre propre compte",
            ));
        }
        if self.users.delete(user_id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound("Utilisateur non trouvé"))
        }
    }
}

// ── Invitation codes ─────────────────────────────────────────────────────────

pub struct MintInvitationCodeUseCase<U: UserRepository, I: InvitationCodeRepository> {
    pub users: U,
    pub invitations: I,
}

impl<U: UserRepository, I: InvitationCodeRepository> MintInvitationCodeUseCase<U, I> {
    /// Mints a `<prefix><random suffix>` code for the assistant or doctor
    /// role. Only those roles have a prefix.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        role: &str,
    ) -> Result<InvitationCode, ApiError> {
        require_admin(&self.users, caller_id).await?;

        let role = Role::from_str(role)
            .ok_or_else(|| ApiError::validation("Rôle invalide pour un code d'invitation"))?;
        let prefix = invitation_prefix(role)
            .ok_or_else(|| ApiError::validation("Rôle invalide pour un code d'invitation"))?;

        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_SUFFIX_LEN)
            .map(|b| (b as char).to_ascii_uppercase())
            .collect();
        let code = InvitationCode {
            id: Uuid::now_v7(),
            code: format!("{prefix}{suffix}"),
            role,
            created_by: caller_id,
            is_used: false,
            created_at: Utc::now(),
        };
        self.invitations.create(&code).await?;
        Ok(code)
    }
}

pub struct ListInvitationCodesUseCase<U: UserRepository, I: InvitationCodeRepository> {
    pub users: U,
    pub invitations: I,
}

impl<U: UserRepository, I: InvitationCodeRepository> ListInvitationCodesUseCase<U, I> {
    pub async fn execute(&self, caller_id: Uuid) -> Result<Vec<InvitationCode>, ApiError> {
        require_admin(&self.users, caller_id).await?;
        self.invitations.list().await
    }
}

// ── System settings ──────────────────────────────────────────────────────────

pub struct ListSettingsUseCase<U: UserRepository, S: SettingsRepository> {
    pub users: U,
    pub settings: S,
}

impl<U: UserRepository, S: SettingsRepository> ListSettingsUseCase<U, S> {
    pub async fn execute(&self, caller_id: Uuid) -> Result<Vec<SystemSetting>, ApiError> {
        require_admin(&self.users, caller_id).await?;
        self.settings.list().await
    }
}

pub struct UpdateSettingUseCase<U: UserRepository, S: SettingsRepository> {
    pub users: U,
    pub settings: S,
}

impl<U: UserRepository, S: SettingsRepository> UpdateSettingUseCase<U, S> {
    /// The new value must parse as the setting's declared type; the type
    /// itself is fixed at seed time.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), ApiError> {
        require_admin(&self.users, caller_id).await?;
        let setting = self
            .settings
            .get(key)
            .await?
            .ok_or(ApiError::NotFound("Paramètre non trouvé"))?;
        if !setting.value_type.accepts(value) {
            return Err(ApiError::validation(
                "Valeur invalide pour ce type de paramètre",
            ));
        }
        self.settings.set_value(key, value).await
    }
}

/// Settings present after every boot. Existing values are never overwritten.
pub const DEFAULT_SETTINGS: &[(&str, &str, SettingType, &str)] = &[
    ("site_name", "i-Health", SettingType::String, "Nom du site"),
    ("maintenance_mode", "false", SettingType::Boolean, "Mode maintenance"),
    ("max_appointments_per_day", "20", SettingType::Integer, "Rendez-vous maximum par jour"),
    ("appointment_duration", "30", SettingType::Integer, "Durée par défaut d'un rendez-vous (minutes)"),
    ("password_min_length", "8", SettingType::Integer, "Longueur minimale du mot de passe"),
    ("require_special_chars", "true", SettingType::Boolean, "Caractères spéciaux requis"),
    ("session_timeout", "30", SettingType::Integer, "Expiration de session (minutes)"),
    ("max_login_attempts", "3", SettingType::Integer, "Tentatives de connexion maximum"),
    ("email_notifications", "true", SettingType::Boolean, "Notifications par email"),
    ("sms_notifications", "false", SettingType::Boolean, "Notifications par SMS"),
    ("reminder_before_appointment", "24", SettingType::Integer, "Rappel avant rendez-vous (heures)"),
    ("backup_frequency", "daily", SettingType::String, "Fréquence des sauvegardes"),
    ("log_retention_days", "30", SettingType::Integer, "Rétention des journaux (jours)"),
    ("debug_mode", "false", SettingType::Boolean, "Mode debug"),
];

/// Seed the default settings at startup, keys already present are untouched.
pub async fn seed_default_settings<S: SettingsRepository>(settings: &S) -> Result<(), ApiError> {
    for &(key, value, value_type, description) in DEFAULT_SETTINGS {
        settings
            .seed(&SystemSetting {
                id: Uuid::now_v7(),
                key: key.to_owned(),
                value: value.to_owned(),
                value_type,
                description: Some(description.to_owned()),
                updated_at: Utc::now(),
            })
            .await?;
    }
    Ok(())
}
