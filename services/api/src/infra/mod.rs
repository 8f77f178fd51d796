pub mod db;
pub mod dicom;
pub mod password;
pub mod storage;
