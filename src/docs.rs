use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use portal_auth::TokenClaims;
use portal_core::{ErrorResponse, PaginationMeta, PaginationParams};
use portal_models::{
    AccessControlRecord, Admission, AdmissionStatus, Book, CheckoutDto, Course,
    CreateAdmissionDto, CreateFeeDto, Degree, Document, Exam, ExamResult, Feature, Fee, FeeStatus,
    LinkAccountDto, Loan, LoanWithBook, LoginRequest, LoginResponse, MessageResponse, PaginatedAdmissionsResponse,
    PaginatedBooksResponse, PaginatedFeesResponse, PaginatedStudentsResponse, Student,
    StudentExamResult, StudentStatus, UpdateAccessControlDto, UpdateAdmissionStatusDto,
    UpdateStudentDto, UserInfo,
};

use crate::modules::dashboard::model::{
    CourseCataloguePage, DashboardOverview, DocumentsPage, ExamsPage, FeatureAccess,
    LibraryCatalogPage, LibraryPage, SettingsPage,
};
use crate::modules::health::controller::HealthStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_current_user,
        crate::modules::access_control::controller::get_my_access,
        crate::modules::access_control::controller::get_student_access,
        crate::modules::access_control::controller::update_access,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_my_student,
        crate::modules::students::controller::get_student_by_id,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::link_student_account,
        crate::modules::degrees::controller::get_degrees,
        crate::modules::degrees::controller::get_degree_by_id,
        crate::modules::degrees::controller::get_degree_courses,
        crate::modules::degrees::controller::get_course_by_id,
        crate::modules::degrees::controller::get_course_exams,
        crate::modules::exams::controller::get_exam_by_id,
        crate::modules::exams::controller::get_exam_results,
        crate::modules::exams::controller::get_my_results,
        crate::modules::fees::controller::get_my_fees,
        crate::modules::fees::controller::get_fees,
        crate::modules::fees::controller::create_fee,
        crate::modules::fees::controller::pay_fee,
        crate::modules::admissions::controller::create_admission,
        crate::modules::admissions::controller::get_admissions,
        crate::modules::admissions::controller::decide_admission,
        crate::modules::library::controller::search_books,
        crate::modules::library::controller::get_my_loans,
        crate::modules::library::controller::get_loans,
        crate::modules::library::controller::checkout_book,
        crate::modules::library::controller::return_loan,
        crate::modules::dashboard::controller::overview,
        crate::modules::dashboard::controller::course_catalogue,
        crate::modules::dashboard::controller::library,
        crate::modules::dashboard::controller::library_catalog,
        crate::modules::dashboard::controller::exams,
        crate::modules::dashboard::controller::documents,
        crate::modules::dashboard::controller::settings,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            HealthStatus,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            UserInfo,
            TokenClaims,
            AccessControlRecord,
            UpdateAccessControlDto,
            StudentStatus,
            Feature,
            Student,
            UpdateStudentDto,
            LinkAccountDto,
            PaginatedStudentsResponse,
            Degree,
            Course,
            Exam,
            ExamResult,
            StudentExamResult,
            Fee,
            FeeStatus,
            CreateFeeDto,
            PaginatedFeesResponse,
            Admission,
            AdmissionStatus,
            CreateAdmissionDto,
            UpdateAdmissionStatusDto,
            PaginatedAdmissionsResponse,
            Book,
            Loan,
            LoanWithBook,
            CheckoutDto,
            PaginatedBooksResponse,
            Document,
            FeatureAccess,
            DashboardOverview,
            CourseCataloguePage,
            LibraryPage,
            LibraryCatalogPage,
            ExamsPage,
            DocumentsPage,
            SettingsPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Operational endpoints"),
        (name = "Authentication", description = "Login, logout and the current identity"),
        (name = "Access Control", description = "Per-student standing and feature flags"),
        (name = "Students", description = "Student records"),
        (name = "Degrees", description = "Degree programmes"),
        (name = "Courses", description = "Courses and their exams"),
        (name = "Exams", description = "Exams and published results"),
        (name = "Fees", description = "Student fees"),
        (name = "Admissions", description = "Applications and admission decisions"),
        (name = "Library", description = "Library catalogue and loans"),
        (name = "Dashboard", description = "Student dashboard pages, gated per feature")
    ),
    info(
        title = "Student Portal API",
        version = "0.1.0",
        description = "Student information portal built with Rust, Axum, and PostgreSQL, with per-feature access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
