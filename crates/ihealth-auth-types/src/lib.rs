pub mod bearer;
pub mod token;
