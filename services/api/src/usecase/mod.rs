pub mod admin;
pub mod appointments;
pub mod auth;
pub mod dicom;
pub mod messages;
pub mod metrics;
pub mod patients;
pub mod prescriptions;
pub mod records;

use uuid::Uuid;

use ihealth_domain::role::Role;

use crate::domain::repository::UserRepository;
use crate::error::ApiError;

/// Fresh role lookup for the authenticated caller. The token's role claim is
/// never trusted; a deleted account fails here even with a live token.
pub(crate) async fn caller_role<U: UserRepository>(
    users: &U,
    caller_id: Uuid,
) -> Result<Role, ApiError> {
    users
        .find_role(caller_id)
        .await?
        .ok_or(ApiError::Unauthorized("Utilisateur non trouvé ou désactivé"))
}
