pub mod access_control;
pub mod admissions;
pub mod auth;
pub mod dashboard;
pub mod degrees;
pub mod exams;
pub mod fees;
pub mod health;
pub mod library;
pub mod students;
