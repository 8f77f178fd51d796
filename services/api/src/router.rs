use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use ihealth_core::health::{healthz, readyz};
use ihealth_core::middleware::request_id_layer;

use crate::handlers::{
    admin::{
        create_user, delete_user, get_stats, list_invitation_codes, list_settings, list_users,
        mint_invitation_code, update_setting, update_user,
    },
    appointments::{
        add_slot, create_appointment, get_agenda, list_appointments, update_appointment_status,
    },
    auth::{login, register},
    dicom::{download_file, list_files, preview_file, upload_file},
    messages::{list_messages, send_message},
    metrics::{add_metric, delete_metric, list_metrics},
    patients::{get_patient_profile, list_doctor_patients, list_doctors, medical_assistance},
    prescriptions::{create_prescription, list_prescriptions},
    records::{get_medical_record, upsert_medical_record},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/register", post(register))
        .route("/login", post(login))
        // Patients & doctors
        .route("/patient/{patient_id}", get(get_patient_profile))
        .route("/doctors", get(list_doctors))
        .route("/doctor/{doctor_id}/patients", get(list_doctor_patients))
        .route("/medical-assistance/{patient_id}", get(medical_assistance))
        // Appointments & agenda
        .route("/appointments", post(create_appointment))
        .route("/appointments/{user_id}", get(list_appointments))
        .route(
            "/appointments/{appointment_id}/status",
            patch(update_appointment_status),
        )
        .route("/agenda/{doctor_id}", get(get_agenda))
        .route("/agenda/slots", post(add_slot))
        // Medical records
        .route("/medical-record/{patient_id}", get(get_medical_record))
        .route("/medical-record/{patient_id}", post(upsert_medical_record))
        // Health metrics
        .route("/health-metrics/{user_id}", get(list_metrics))
        .route("/health-metrics", post(add_metric))
        .route("/health-metrics/{metric_id}", delete(delete_metric))
        // Messages
        .route("/messages", post(send_message))
        .route("/messages/{user_id}", get(list_messages))
        // Prescriptions
        .route("/prescriptions", post(create_prescription))
        .route("/prescriptions/{patient_id}", get(list_prescriptions))
        // DICOM
        .route("/dicom/files", post(upload_file))
        .route("/dicom/files/{patient_id}", get(list_files))
        .route("/dicom/files/{file_id}/download", get(download_file))
        .route("/dicom/files/{file_id}/preview", get(preview_file))
        // Admin
        .route("/admin/stats", get(get_stats))
        .route("/admin/users", get(list_users))
        .route("/admin/users", post(create_user))
        .route("/admin/users/{user_id}", patch(update_user))
        .route("/admin/users/{user_id}", delete(delete_user))
        .route("/admin/invitation-codes", post(mint_invitation_code))
        .route("/admin/invitation-codes", get(list_invitation_codes))
        .route("/admin/settings", get(list_settings))
        .route("/admin/settings/{key}", put(update_setting))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
