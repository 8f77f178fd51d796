pub mod admin;
pub mod appointments;
pub mod auth;
pub mod dicom;
pub mod messages;
pub mod metrics;
pub mod patients;
pub mod prescriptions;
pub mod records;
