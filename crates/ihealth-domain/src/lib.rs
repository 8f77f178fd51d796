pub mod medication;
pub mod role;
pub mod validate;
