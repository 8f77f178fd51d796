pub mod appointments;
pub mod availability_slots;
pub mod dicom_files;
pub mod health_metrics;
pub mod invitation_codes;
pub mod medical_records;
pub mod messages;
pub mod prescriptions;
pub mod system_settings;
pub mod users;
