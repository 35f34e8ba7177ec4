use portal_models::{
    AccessControlRecord, Course, Degree, Document, Feature, LoanWithBook, PaginatedBooksResponse,
    StudentExamResult, StudentStatus,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Whether one feature is usable right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeatureAccess {
    pub feature: Feature,
    pub enabled: bool,
}

impl FeatureAccess {
    /// Effective access per feature. No record, or a terminal status, disables everything.
    pub fn from_record(record: Option<&AccessControlRecord>) -> Vec<Self> {
        Feature::ALL
            .into_iter()
            .map(|feature| Self {
                feature,
                enabled: record.is_some_and(|r| !r.is_terminal() && r.grants(feature)),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardOverview {
    pub name: String,
    pub email: Option<String>,
    pub student_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub features: Vec<FeatureAccess>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseCataloguePage {
    pub degree: Option<Degree>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryPage {
    pub loans: Vec<LoanWithBook>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryCatalogPage {
    pub books: PaginatedBooksResponse,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExamsPage {
    pub results: Vec<StudentExamResult>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentsPage {
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsPage {
    pub name: String,
    pub email: Option<String>,
    pub uid: Option<String>,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: StudentStatus) -> AccessControlRecord {
        AccessControlRecord {
            id: 1,
            student_id: 42,
            status: Some(status),
            access_course: true,
            access_library: false,
            access_exams: true,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn enabled(features: &[FeatureAccess]) -> Vec<Feature> {
        features
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.feature)
            .collect()
    }

    #[test]
    fn test_flags_map_to_features() {
        let features = FeatureAccess::from_record(Some(&record(StudentStatus::Active)));
        assert_eq!(features.len(), 4);
        assert_eq!(enabled(&features), vec![Feature::CourseCatalogue, Feature::Exams]);
    }

    #[test]
    fn test_terminal_status_disables_everything() {
        let features = FeatureAccess::from_record(Some(&record(StudentStatus::Suspended)));
        assert!(enabled(&features).is_empty());
    }

    #[test]
    fn test_missing_record_disables_everything() {
        assert!(enabled(&FeatureAccess::from_record(None)).is_empty());
    }
}
