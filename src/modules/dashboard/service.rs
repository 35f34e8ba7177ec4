use anyhow::Context;
use portal_auth::TokenClaims;
use portal_core::AppError;
use portal_db::{AccessControlStore, StudentDirectory};
use portal_models::Document;
use sqlx::PgPool;
use tracing::instrument;

use super::model::{CourseCataloguePage, DashboardOverview, FeatureAccess};
use crate::modules::degrees::service::DegreeService;
use crate::modules::students::service::StudentService;

pub struct DashboardService;

impl DashboardService {
    /// Overview built from the access-control stores only.
    #[instrument(skip(students, access_control, claims), fields(user_id = claims.user_id))]
    pub async fn overview(
        students: &dyn StudentDirectory,
        access_control: &dyn AccessControlStore,
        claims: &TokenClaims,
    ) -> Result<DashboardOverview, AppError> {
        let student_id = students
            .student_id_for_user(claims.user_id)
            .await
            .map_err(AppError::database)?;

        let record = match student_id {
            Some(student_id) => access_control
                .fetch_by_student_id(student_id)
                .await
                .map_err(AppError::database)?,
            None => None,
        };

        Ok(DashboardOverview {
            name: claims.name.clone(),
            email: claims.email.clone(),
            student_id,
            status: record.as_ref().and_then(|r| r.status),
            features: FeatureAccess::from_record(record.as_ref()),
        })
    }

    #[instrument(skip(db))]
    pub async fn course_catalogue(
        db: &PgPool,
        student_id: i64,
    ) -> Result<CourseCataloguePage, AppError> {
        let student = StudentService::get_student_by_id(db, student_id).await?;

        let Some(degree_id) = student.degree_id else {
            return Ok(CourseCataloguePage {
                degree: None,
                courses: Vec::new(),
            });
        };

        let degree = DegreeService::get_degree_by_id(db, degree_id).await?;
        let courses = DegreeService::get_courses_for_degree(db, degree_id).await?;

        Ok(CourseCataloguePage {
            degree: Some(degree),
            courses,
        })
    }

    #[instrument(skip(db))]
    pub async fn documents(db: &PgPool, student_id: i64) -> Result<Vec<Document>, AppError> {
        sqlx::query_as::<_, Document>(
            r#"SELECT id, student_id, title, kind, url, issued_at
               FROM documents
               WHERE student_id = $1
               ORDER BY issued_at DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch documents")
        .map_err(AppError::database)
    }
}
