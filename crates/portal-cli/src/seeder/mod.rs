//! Database seeding for development and manual testing.
//!
//! Seeded rows are tagged so [`clear_all`] can remove them without touching
//! real data: emails use [`SEED_EMAIL_DOMAIN`], degree codes and ISBNs start
//! with [`SEED_CODE_PREFIX`].

pub mod catalogue;
pub mod models;
pub mod students;

use std::time::Instant;

use anyhow::anyhow;
use portal_core::hash_password;
use sqlx::PgPool;

pub use models::{SEED_CODE_PREFIX, SEED_EMAIL_DOMAIN, SeedConfig};

/// Password shared by all seeded student accounts.
pub const SEED_PASSWORD: &str = "password123";

/// Short tag distinguishing one seeding run from another.
fn run_tag() -> String {
    format!("{:X}", chrono::Utc::now().timestamp() % 0xFFFFF)
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let tag = run_tag();
    println!("🌱 Seeding database (run {})...\n", tag);

    let password_hash =
        hash_password(SEED_PASSWORD).map_err(|e| anyhow!("Failed to hash password: {}", e.error))?;

    let degrees = catalogue::seed_degrees(db, config.degrees, &tag).await?;
    catalogue::seed_courses(db, &degrees, config.courses_per_degree).await?;
    catalogue::seed_books(db, config.books, &tag).await?;

    let degree_ids: Vec<i64> = degrees.iter().map(|(id, _)| *id).collect();
    students::seed_students(
        db,
        &degree_ids,
        config.students_per_degree,
        &password_hash,
        &tag,
    )
    .await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    println!("   Student accounts use password: {}", SEED_PASSWORD);

    Ok(())
}

/// Removes everything [`seed_all`] created, along with rows that reference it.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let email_pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let code_pattern = format!("{}%", SEED_CODE_PREFIX);

    let mut tx = db.begin().await?;

    let seeded_students = "SELECT id FROM students WHERE email LIKE $1";
    for table in ["library_loans", "fees", "exam_results", "documents", "access_control"] {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE student_id IN ({})",
            table, seeded_students
        ))
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(&format!(
        "UPDATE admissions SET student_id = NULL WHERE student_id IN ({})",
        seeded_students
    ))
    .bind(&email_pattern)
    .execute(&mut *tx)
    .await?;

    let students = sqlx::query("DELETE FROM students WHERE email LIKE $1")
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM users WHERE email LIKE $1 AND NOT is_admin")
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "DELETE FROM library_loans WHERE book_id IN \
         (SELECT id FROM library_books WHERE isbn LIKE $1)",
    )
    .bind(&code_pattern)
    .execute(&mut *tx)
    .await?;
    let books = sqlx::query("DELETE FROM library_books WHERE isbn LIKE $1")
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let seeded_degrees = "SELECT id FROM degrees WHERE code LIKE $1";
    sqlx::query(&format!(
        "DELETE FROM exam_results WHERE exam_id IN \
         (SELECT e.id FROM exams e JOIN courses c ON c.id = e.course_id WHERE c.degree_id IN ({}))",
        seeded_degrees
    ))
    .bind(&code_pattern)
    .execute(&mut *tx)
    .await?;
    sqlx::query(&format!(
        "DELETE FROM exams WHERE course_id IN \
         (SELECT id FROM courses WHERE degree_id IN ({}))",
        seeded_degrees
    ))
    .bind(&code_pattern)
    .execute(&mut *tx)
    .await?;
    sqlx::query(&format!("DELETE FROM courses WHERE degree_id IN ({})", seeded_degrees))
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("DELETE FROM admissions WHERE degree_id IN ({})", seeded_degrees))
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!(
        "UPDATE students SET degree_id = NULL WHERE degree_id IN ({})",
        seeded_degrees
    ))
    .bind(&code_pattern)
    .execute(&mut *tx)
    .await?;
    let degrees = sqlx::query("DELETE FROM degrees WHERE code LIKE $1")
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} students, {} books, {} degrees in {:?}",
        students,
        books,
        degrees,
        start_time.elapsed()
    );
    Ok(())
}
