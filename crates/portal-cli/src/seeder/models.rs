//! Seed records and seeding configuration.

use portal_models::StudentStatus;

/// Every seeded email ends with this domain; clearing relies on it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.example.com";
/// Prefix for seeded degree codes and book ISBNs.
pub const SEED_CODE_PREFIX: &str = "SEED-";

pub struct DegreeSeed {
    pub code: String,
    pub name: String,
    pub duration_years: i32,
}

pub struct CourseSeed {
    pub degree_id: i64,
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub semester: i32,
}

pub struct BookSeed {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub copies: i32,
}

pub struct StudentSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub degree_id: i64,
    pub enrollment_year: i32,
    pub access: AccessSeed,
}

impl StudentSeed {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessSeed {
    pub status: Option<StudentStatus>,
    pub access_course: bool,
    pub access_library: bool,
    pub access_exams: bool,
}

#[derive(Clone)]
pub struct SeedConfig {
    pub degrees: usize,
    pub courses_per_degree: usize,
    pub books: usize,
    pub students_per_degree: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            degrees: 3,
            courses_per_degree: 8,
            books: 50,
            students_per_degree: 40,
        }
    }
}

impl SeedConfig {
    pub fn new(degrees: usize) -> Self {
        Self {
            degrees,
            ..Default::default()
        }
    }

    pub fn with_courses(mut self, courses_per_degree: usize) -> Self {
        self.courses_per_degree = courses_per_degree;
        self
    }

    pub fn with_books(mut self, books: usize) -> Self {
        self.books = books;
        self
    }

    pub fn with_students(mut self, students_per_degree: usize) -> Self {
        self.students_per_degree = students_per_degree;
        self
    }

    pub fn total_students(&self) -> usize {
        self.degrees * self.students_per_degree
    }
}
