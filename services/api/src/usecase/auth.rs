//! Registration and login.

use chrono::Utc;
use uuid::Uuid;

use ihealth_auth_types::token::issue_access_token;
use ihealth_domain::role::Role;
use ihealth_domain::validate::{
    BirthdateError, is_valid_email, is_valid_invitation_code, is_valid_phone, parse_birthdate,
};

use crate::domain::repository::{InvitationCodeRepository, UserRepository};
use crate::domain::types::{InitialMedicalData, User};
use crate::error::ApiError;
use crate::infra::password::{hash_password, verify_password};

// ── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<String>,
    pub speciality: Option<String>,
    pub license_number: Option<String>,
    pub work_location: Option<String>,
    pub invitation_code: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: Uuid,
}

pub struct RegisterUseCase<U: UserRepository, I: InvitationCodeRepository> {
    pub users: U,
    pub invitations: I,
}

impl<U: UserRepository, I: InvitationCodeRepository> RegisterUseCase<U, I> {
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, ApiError> {
        let email = non_empty(input.email);
        let password = non_empty(input.password);
        let role = non_empty(input.role);
        let name = non_empty(input.name);
        let (Some(email), Some(password), Some(role), Some(name)) =
            (email, password, role, name)
        else {
            return Err(ApiError::validation(
                "Email, mot de passe, rôle et nom sont requis",
            ));
        };

        let role = Role::from_str(&role).ok_or_else(|| ApiError::validation("Rôle invalide"))?;

        if !is_valid_email(&email) {
            return Err(ApiError::validation("Adresse email invalide"));
        }

        let phone = non_empty(input.phone);
        let mut birthdate = None;
        if role == Role::Patient {
            if !phone.as_deref().is_some_and(is_valid_phone) {
                return Err(ApiError::validation(
                    "Numéro de téléphone requis et invalide pour un patient",
                ));
            }
            let raw = non_empty(input.birthdate).ok_or_else(|| {
                ApiError::validation("Date de naissance requise pour un patient")
            })?;
            birthdate = Some(
                parse_birthdate(&raw, Utc::now().date_naive()).map_err(|e| match e {
                    BirthdateError::InFuture => {
                        ApiError::validation("Date de naissance doit être dans le passé")
                    }
                    BirthdateError::Malformed => {
                        ApiError::validation("Format de date invalide (YYYY-MM-DD)")
                    }
                })?,
            );
        }

        let invitation_code = non_empty(input.invitation_code);
        if role == Role::Assistant {
            let code = invitation_code.as_deref().ok_or_else(|| {
                ApiError::validation("Code d'invitation requis pour les assistants")
            })?;
            if !is_valid_invitation_code(code, role) {
                return Err(ApiError::validation("Code d'invitation invalide"));
            }
        }

        let speciality = non_empty(input.speciality);
        let license_number = non_empty(input.license_number);
        let work_location = non_empty(input.work_location);
        if role == Role::Doctor {
            if speciality.is_none() || license_number.is_none() || work_location.is_none() {
                return Err(ApiError::validation(
                    "Spécialité, numéro de licence et lieu de travail requis pour un médecin",
                ));
            }
            let code = invitation_code.as_deref().ok_or_else(|| {
                ApiError::validation("Code d'invitation requis pour les médecins")
            })?;
            if !is_valid_invitation_code(code, role) {
                return Err(ApiError::validation("Code d'invitation invalide"));
            }
        }

        let user = User {
            id: Uuid::now_v7(),
            password_hash: hash_password(&password)?,
            email,
            role,
            name,
            phone,
            birthdate,
            speciality,
            license_number,
            work_location,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        };

        let medical_history = non_empty(input.medical_history);
        let allergies = non_empty(input.allergies);
        let medical = (role == Role::Patient
            && (medical_history.is_some() || allergies.is_some()))
        .then_some(InitialMedicalData {
            medical_history,
            allergies,
        });

        self.users.create(&user, medical.as_ref()).await?;

        if matches!(role, Role::Assistant | Role::Doctor) {
            if let Some(code) = invitation_code.as_deref() {
                self.invitations.consume(code).await?;
            }
        }

        Ok(RegisterOutput { user_id: user.id })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub user: User,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let (Some(email), Some(password)) = (non_empty(input.email), non_empty(input.password))
        else {
            return Err(ApiError::validation("Email et mot de passe requis"));
        };

        let user = self
            .users
            .find_active_by_email(&email)
            .await?
            .ok_or(ApiError::Unauthorized("Utilisateur non trouvé ou désactivé"))?;

        if !verify_password(&password, &user.password_hash) {
            return Err(ApiError::Unauthorized("Email ou mot de passe incorrect"));
        }

        self.users.touch_last_login(user.id).await?;

        let (access_token, _exp) = issue_access_token(user.id, user.role, &self.jwt_secret)
            .map_err(|e| anyhow::Error::new(e).context("issue access token"))?;

        Ok(LoginOutput { access_token, user })
    }
}
