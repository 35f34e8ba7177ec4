//! Student seeding: a login account, a student row and an access-control
//! record per generated student.

use std::time::Instant;

use chrono::Datelike;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::{Fake, Faker};
use portal_models::StudentStatus;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{AccessSeed, SEED_EMAIL_DOMAIN, StudentSeed};

/// Most seeded students are active; the rest cover the other standings.
const STATUS_POOL: [Option<StudentStatus>; 10] = [
    Some(StudentStatus::Active),
    Some(StudentStatus::Active),
    Some(StudentStatus::Active),
    Some(StudentStatus::Active),
    Some(StudentStatus::Active),
    Some(StudentStatus::Supplementary),
    Some(StudentStatus::Alumni),
    Some(StudentStatus::Suspended),
    Some(StudentStatus::DroppedOut),
    None,
];

fn generate_access() -> AccessSeed {
    let status = STATUS_POOL[(0..STATUS_POOL.len()).fake::<usize>()];
    AccessSeed {
        status,
        access_course: Faker.fake(),
        access_library: Faker.fake(),
        access_exams: Faker.fake(),
    }
}

pub fn generate_students(
    degree_ids: &[i64],
    per_degree: usize,
    run_tag: &str,
) -> Vec<StudentSeed> {
    let this_year = chrono::Utc::now().year();

    degree_ids
        .par_iter()
        .enumerate()
        .flat_map(|(degree_idx, &degree_id)| {
            (0..per_degree)
                .map(|student_idx| {
                    let first_name: String = FirstName().fake();
                    let last_name: String = LastName().fake();
                    let email = format!(
                        "{}.{}+{}{}@{}",
                        first_name.to_lowercase(),
                        last_name.to_lowercase(),
                        run_tag.to_lowercase(),
                        degree_idx * 10_000 + student_idx,
                        SEED_EMAIL_DOMAIN
                    );

                    StudentSeed {
                        first_name,
                        last_name,
                        email,
                        phone: Some(PhoneNumber().fake()),
                        degree_id,
                        enrollment_year: this_year - (0..4i32).fake::<i32>(),
                        access: generate_access(),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    degree_ids: &[i64],
    per_degree: usize,
    password_hash: &str,
    run_tag: &str,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let students = generate_students(degree_ids, per_degree, run_tag);
    println!(
        "🧑‍🎓 Seeding {} students ({} per degree)...",
        students.len(),
        per_degree
    );

    let mut tx = db.begin().await?;

    // 10 params per student across the three inserts
    for chunk in students.chunks(500) {
        let user_ids = insert_users_chunk(&mut tx, chunk, password_hash).await?;
        let student_ids = insert_students_chunk(&mut tx, chunk, &user_ids).await?;
        insert_access_chunk(&mut tx, chunk, &student_ids).await?;
    }

    tx.commit().await?;
    println!(
        "   ✓ Inserted {} students with access records in {:?}",
        students.len(),
        start_time.elapsed()
    );

    Ok(students.len())
}

fn placeholders(rows: usize, columns: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=columns)
                .map(|col| format!("${}", row * columns + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
    password_hash: &str,
) -> anyhow::Result<Vec<i64>> {
    let query = format!(
        "INSERT INTO users (name, email, password) VALUES {} RETURNING id",
        placeholders(students.len(), 3)
    );

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for student in students {
        q = q
            .bind(student.full_name())
            .bind(&student.email)
            .bind(password_hash);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
    user_ids: &[i64],
) -> anyhow::Result<Vec<i64>> {
    let query = format!(
        "INSERT INTO students (user_id, degree_id, first_name, last_name, email, phone, enrollment_year) \
         VALUES {} RETURNING id",
        placeholders(students.len(), 7)
    );

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for (student, user_id) in students.iter().zip(user_ids) {
        q = q
            .bind(user_id)
            .bind(student.degree_id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.email)
            .bind(&student.phone)
            .bind(student.enrollment_year);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_access_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
    student_ids: &[i64],
) -> anyhow::Result<()> {
    let query = format!(
        "INSERT INTO access_control (student_id, status, access_course, access_library, access_exams) \
         VALUES {}",
        placeholders(students.len(), 5)
    );

    let mut q = sqlx::query(&query);
    for (student, student_id) in students.iter().zip(student_ids) {
        q = q
            .bind(student_id)
            .bind(student.access.status)
            .bind(student.access.access_course)
            .bind(student.access.access_library)
            .bind(student.access.access_exams);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}
