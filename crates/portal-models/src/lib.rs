//! # Portal Models
//!
//! Domain models and DTOs for the student portal API.
//!
//! # Modules
//!
//! - [`access_control`]: per-student status and feature flags
//! - [`auth`]: login request and response bodies
//! - [`users`]: portal accounts
//! - [`students`]: student records
//! - [`degrees`]: degrees and their courses
//! - [`exams`]: exams and published results
//! - [`fees`]: fee items and payments
//! - [`admissions`]: applications and their decisions
//! - [`library`]: books and loans
//! - [`documents`]: issued student documents
//!
//! # Example
//!
//! ```ignore
//! use portal_models::access_control::{AccessControlRecord, Feature};
//!
//! if record.grants(Feature::Library) {
//!     println!("library unlocked");
//! }
//! ```

pub mod access_control;
pub mod admissions;
pub mod auth;
pub mod degrees;
pub mod documents;
pub mod exams;
pub mod fees;
pub mod library;
pub mod students;
pub mod users;

pub use access_control::{
    AccessControlRecord, Feature, NewAccessControl, StudentStatus, UpdateAccessControl,
    UpdateAccessControlDto,
};
pub use admissions::{
    Admission, AdmissionFilterParams, AdmissionStatus, CreateAdmissionDto,
    PaginatedAdmissionsResponse, UpdateAdmissionStatusDto,
};
pub use auth::{LoginRequest, LoginResponse, MessageResponse};
pub use degrees::{Course, Degree};
pub use documents::Document;
pub use exams::{Exam, ExamResult, StudentExamResult};
pub use fees::{CreateFeeDto, Fee, FeeQueryParams, FeeStatus, PaginatedFeesResponse};
pub use library::{
    Book, BookSearchParams, CheckoutDto, Loan, LoanQueryParams, LoanWithBook,
    PaginatedBooksResponse,
};
pub use students::{
    LinkAccountDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};
pub use users::{User, UserInfo};
