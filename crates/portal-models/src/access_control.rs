//! Access control models.
//!
//! Every student has at most one [`AccessControlRecord`]. It carries the
//! student's standing and one boolean per gated feature. A missing record
//! grants nothing.

use std::fmt;
use std::str::FromStr;

use portal_core::serde::deserialize_some;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A student's standing with the institution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "student_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Alumni,
    DroppedOut,
    Supplementary,
    Suspended,
}

impl StudentStatus {
    /// Suspended and dropped-out students lose every feature regardless of flags.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Suspended | Self::DroppedOut)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Alumni => "alumni",
            Self::DroppedOut => "dropped_out",
            Self::Supplementary => "supplementary",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "alumni" => Ok(Self::Alumni),
            "dropped_out" => Ok(Self::DroppedOut),
            "supplementary" => Ok(Self::Supplementary),
            "suspended" => Ok(Self::Suspended),
            other => Err(format!("unknown student status: {}", other)),
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portal area that can be switched on or off per student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    CourseCatalogue,
    Library,
    Exams,
    Documents,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::CourseCatalogue,
        Feature::Library,
        Feature::Exams,
        Feature::Documents,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CourseCatalogue => "courseCatalogue",
            Self::Library => "library",
            Self::Exams => "exams",
            Self::Documents => "documents",
        }
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| format!("unknown feature: {}", s))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's standing and feature flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AccessControlRecord {
    pub id: i64,
    pub student_id: i64,
    pub status: Option<StudentStatus>,
    pub access_course: bool,
    pub access_library: bool,
    pub access_exams: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AccessControlRecord {
    /// Returns the flag for `feature`. Documents have no flag and are never granted.
    #[must_use]
    pub fn grants(&self, feature: Feature) -> bool {
        match feature {
            Feature::CourseCatalogue => self.access_course,
            Feature::Library => self.access_library,
            Feature::Exams => self.access_exams,
            Feature::Documents => false,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(StudentStatus::is_terminal)
    }
}

/// Initial values for a freshly created record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NewAccessControl {
    pub status: Option<StudentStatus>,
    pub access_course: bool,
    pub access_library: bool,
    pub access_exams: bool,
}

impl NewAccessControl {
    /// Values given to a student created from an accepted admission.
    #[must_use]
    pub fn admitted() -> Self {
        Self {
            status: Some(StudentStatus::Active),
            access_course: true,
            access_library: true,
            access_exams: true,
        }
    }
}

/// Partial update body for `PATCH /api/access-control/{id}`.
///
/// Omitted fields are left unchanged. `status` may be sent as `null` to clear it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAccessControlDto {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<StudentStatus>, nullable)]
    pub status: Option<Option<StudentStatus>>,
    pub access_course: Option<bool>,
    pub access_library: Option<bool>,
    pub access_exams: Option<bool>,
}

impl UpdateAccessControlDto {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.access_course.is_none()
            && self.access_library.is_none()
            && self.access_exams.is_none()
    }
}

/// An administrative update addressed to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAccessControl {
    pub id: i64,
    pub status: Option<Option<StudentStatus>>,
    pub access_course: Option<bool>,
    pub access_library: Option<bool>,
    pub access_exams: Option<bool>,
}

impl UpdateAccessControl {
    #[must_use]
    pub fn new(id: i64, dto: UpdateAccessControlDto) -> Self {
        Self {
            id,
            status: dto.status,
            access_course: dto.access_course,
            access_library: dto.access_library,
            access_exams: dto.access_exams,
        }
    }

    /// Applies the update to `record` in place, leaving omitted fields alone.
    pub fn apply_to(&self, record: &mut AccessControlRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(value) = self.access_course {
            record.access_course = value;
        }
        if let Some(value) = self.access_library {
            record.access_library = value;
        }
        if let Some(value) = self.access_exams {
            record.access_exams = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: Option<StudentStatus>) -> AccessControlRecord {
        AccessControlRecord {
            id: 1,
            student_id: 42,
            status,
            access_course: true,
            access_library: false,
            access_exams: true,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(StudentStatus::Suspended.is_terminal());
        assert!(StudentStatus::DroppedOut.is_terminal());
        assert!(!StudentStatus::Active.is_terminal());
        assert!(!StudentStatus::Alumni.is_terminal());
        assert!(!StudentStatus::Supplementary.is_terminal());
        assert!(!record(None).is_terminal());
    }

    #[test]
    fn test_grants_follows_flags() {
        let r = record(Some(StudentStatus::Active));
        assert!(r.grants(Feature::CourseCatalogue));
        assert!(!r.grants(Feature::Library));
        assert!(r.grants(Feature::Exams));
    }

    #[test]
    fn test_documents_never_granted() {
        let mut r = record(Some(StudentStatus::Active));
        r.access_course = true;
        r.access_library = true;
        r.access_exams = true;
        assert!(!r.grants(Feature::Documents));
    }

    #[test]
    fn test_feature_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), feature);
        }
        assert!("courses".parse::<Feature>().is_err());
        assert_eq!(
            serde_json::to_string(&Feature::CourseCatalogue).unwrap(),
            r#""courseCatalogue""#
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StudentStatus::DroppedOut).unwrap(),
            r#""dropped_out""#
        );
        assert_eq!(
            "dropped_out".parse::<StudentStatus>().unwrap(),
            StudentStatus::DroppedOut
        );
    }

    #[test]
    fn test_update_dto_distinguishes_null_status() {
        let clear: UpdateAccessControlDto = serde_json::from_str(r#"{"status":null}"#).unwrap();
        assert_eq!(clear.status, Some(None));
        assert!(!clear.is_empty());

        let empty: UpdateAccessControlDto = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_apply_to_leaves_omitted_fields() {
        let mut r = record(Some(StudentStatus::Active));
        let update = UpdateAccessControl::new(
            1,
            UpdateAccessControlDto {
                status: Some(None),
                access_library: Some(true),
                ..Default::default()
            },
        );
        update.apply_to(&mut r);

        assert_eq!(r.status, None);
        assert!(r.access_library);
        assert!(r.access_course);
        assert!(r.access_exams);
    }

    #[test]
    fn test_admitted_defaults() {
        let admitted = NewAccessControl::admitted();
        assert_eq!(admitted.status, Some(StudentStatus::Active));
        assert!(admitted.access_course && admitted.access_library && admitted.access_exams);

        let default = NewAccessControl::default();
        assert!(!default.access_course && !default.access_library && !default.access_exams);
    }
}
