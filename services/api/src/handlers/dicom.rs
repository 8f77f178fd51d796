use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use ihealth_auth_types::bearer::Identity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::dicom::{
    DownloadDicomUseCase, ListDicomFilesUseCase, PreviewDicomUseCase, UploadDicomInput,
    UploadDicomUseCase,
};

// ── POST /dicom/files ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub file_id: Uuid,
}

pub async fn upload_file(
    Identity(caller): Identity,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut patient_id: Option<Uuid> = None;
    let mut file_name: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Requête multipart invalide"))?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_owned);
                bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| ApiError::validation("Requête multipart invalide"))?
                        .to_vec(),
                );
            }
            Some("patient_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::validation("Requête multipart invalide"))?;
                patient_id = Some(
                    text.parse()
                        .map_err(|_| ApiError::validation("Identifiant patient invalide"))?,
                );
            }
            Some("description") => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Requête multipart invalide"))?,
                );
            }
            _ => {}
        }
    }

    let (Some(patient_id), Some(bytes)) = (patient_id, bytes) else {
        return Err(ApiError::validation("Fichier et identifiant patient requis"));
    };

    let usecase = UploadDicomUseCase {
        users: state.user_repo(),
        files: state.dicom_file_repo(),
        storage: state.storage.clone(),
    };
    let file_id = usecase
        .execute(
            caller.user_id,
            UploadDicomInput {
                patient_id,
                file_name: file_name.unwrap_or_else(|| "image.dcm".to_owned()),
                bytes,
                description,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Fichier DICOM téléversé",
            file_id,
        }),
    ))
}

// ── GET /dicom/files/{patient_id} ────────────────────────────────────────────

#[derive(Serialize)]
pub struct DicomFilesResponse {
    pub files: Vec<DicomFileEntry>,
}

#[derive(Serialize)]
pub struct DicomFileEntry {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub metadata: serde_json::Value,
    pub study_date: Option<NaiveDate>,
    pub modality: Option<String>,
    pub body_part: Option<String>,
    pub description: Option<String>,
    #[serde(serialize_with = "ihealth_core::serde::to_rfc3339_ms")]
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_files(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<DicomFilesResponse>, ApiError> {
    let usecase = ListDicomFilesUseCase {
        users: state.user_repo(),
        files: state.dicom_file_repo(),
    };
    let files = usecase
        .execute(caller.user_id, patient_id)
        .await?
        .into_iter()
        .map(|f| DicomFileEntry {
            id: f.file.id,
            patient_id: f.file.patient_id,
            patient_name: f.patient_name,
            doctor_id: f.file.doctor_id,
            doctor_name: f.doctor_name,
            file_name: f.file.file_name,
            file_size: f.file.file_size,
            mime_type: f.file.mime_type,
            metadata: f.file.metadata,
            study_date: f.file.study_date,
            modality: f.file.modality,
            body_part: f.file.body_part,
            description: f.file.description,
            uploaded_at: f.file.uploaded_at,
        })
        .collect();
    Ok(Json(DicomFilesResponse { files }))
}

// ── GET /dicom/files/{file_id}/download ──────────────────────────────────────

pub async fn download_file(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let usecase = DownloadDicomUseCase {
        users: state.user_repo(),
        files: state.dicom_file_repo(),
        storage: state.storage.clone(),
    };
    let (file, bytes) = usecase.execute(caller.user_id, file_id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// ── GET /dicom/files/{file_id}/preview ───────────────────────────────────────

pub async fn preview_file(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let usecase = PreviewDicomUseCase {
        users: state.user_repo(),
        files: state.dicom_file_repo(),
        storage: state.storage.clone(),
    };
    let jpeg = usecase.execute(caller.user_id, file_id).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg).into_response())
}
