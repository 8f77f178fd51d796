//! DICOM file upload, listing, download and JPEG preview.

use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use ihealth_domain::role::Role;

use crate::domain::repository::{DicomFileRepository, UserRepository};
use crate::domain::types::{DicomFile, DicomFileWithNames};
use crate::error::ApiError;
use crate::infra::dicom::{read_tags, render_preview};
use crate::infra::storage::DicomStorage;
use crate::usecase::caller_role;

fn check_file_access(role: Role, caller_id: Uuid, patient_id: Uuid) -> Result<(), ApiError> {
    if role.is_admin() || role.is_doctor() || caller_id == patient_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Non autorisé à accéder à ce fichier"))
    }
}

// ── POST /dicom/files ────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct UploadDicomInput {
    pub patient_id: Uuid,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub description: Option<String>,
}

pub struct UploadDicomUseCase<U: UserRepository, D: DicomFileRepository> {
    pub users: U,
    pub files: D,
    pub storage: DicomStorage,
}

impl<U: UserRepository, D: DicomFileRepository> UploadDicomUseCase<U, D> {
    /// Any binary is accepted; tag extraction is best-effort and only the
    /// preview needs a decodable image.
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: UploadDicomInput,
    ) -> Result<Uuid, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor()) {
            return Err(ApiError::Forbidden(
                "Non autorisé à téléverser des fichiers DICOM",
            ));
        }
        if input.bytes.is_empty() {
            return Err(ApiError::validation("Fichier DICOM requis"));
        }

        let id = Uuid::now_v7();
        let relative = format!("{}/{}.dcm", input.patient_id, id);
        let file_size = input.bytes.len() as i64;
        self.storage.save(&relative, &input.bytes).await?;

        let path = self.storage.resolve(&relative);
        let tags = tokio::task::spawn_blocking(move || read_tags(&path))
            .await
            .context("join tag extraction task")?;

        let file = DicomFile {
            id,
            patient_id: input.patient_id,
            doctor_id: caller_id,
            file_name: input.file_name,
            file_path: relative,
            file_size,
            mime_type: "application/dicom".to_owned(),
            metadata: tags.metadata,
            study_date: tags.study_date,
            modality: tags.modality,
            body_part: tags.body_part,
            description: input.description,
            uploaded_at: Utc::now(),
        };
        self.files.create(&file).await?;
        Ok(file.id)
    }
}

// ── GET /dicom/files/{patient_id} ────────────────────────────────────────────

pub struct ListDicomFilesUseCase<U: UserRepository, D: DicomFileRepository> {
    pub users: U,
    pub files: D,
}

impl<U: UserRepository, D: DicomFileRepository> ListDicomFilesUseCase<U, D> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<DicomFileWithNames>, ApiError> {
        let role = caller_role(&self.users, caller_id).await?;
        if !(role.is_admin() || role.is_doctor() || caller_id == patient_id) {
            return Err(ApiError::Forbidden("Non autorisé à voir ces fichiers"));
        }
        self.files.list_for_patient(patient_id).await
    }
}

// ── GET /dicom/files/{file_id}/download ──────────────────────────────────────

pub struct DownloadDicomUseCase<U: UserRepository, D: DicomFileRepository> {
    pub users: U,
    pub files: D,
    pub storage: DicomStorage,
}

impl<U: UserRepository, D: DicomFileRepository> DownloadDicomUseCase<U, D> {
    pub async fn execute(
        &self,
        caller_id: Uuid,
        file_id: Uuid,
    ) -> Result<(DicomFile, Vec<u8>), ApiError> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or(ApiError::NotFound("Fichier DICOM non trouvé"))?;

        let role = caller_role(&self.users, caller_id).await?;
        check_file_access(role, caller_id, file.patient_id)?;

        let bytes = self
            .storage
            .load(&file.file_path)
            .await?
            .ok_or(ApiError::NotFound("Fichier DICOM non trouvé"))?;
        Ok((file, bytes))
    }
}

// ── GET /dicom/files/{file_id}/preview ───────────────────────────────────────

pub struct PreviewDicomUseCase<U: UserRepository, D: DicomFileRepository> {
    pub users: U,
    pub files: D,
    pub storage: DicomStorage,
}

impl<U: UserRepository, D: DicomFileRepository> PreviewDicomUseCase<U, D> {
    /// Returns JPEG bytes. Decode problems (including a file missing on disk)
    /// degrade to the placeholder; only a missing row is a 404.
    pub async fn execute(&self, caller_id: Uuid, file_id: Uuid) -> Result<Vec<u8>, ApiError> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or(ApiError::NotFound("Fichier DICOM non trouvé"))?;

        let role = caller_role(&self.users, caller_id).await?;
        check_file_access(role, caller_id, file.patient_id)?;

        let path = self.storage.resolve(&file.file_path);
        let jpeg = tokio::task::spawn_blocking(move || render_preview(&path))
            .await
            .context("join preview render task")?;
        Ok(jpeg)
    }
}
