//! Degree, course and library book seeding.

use std::time::Instant;

use fake::Fake;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::PgPool;

use super::models::{BookSeed, CourseSeed, DegreeSeed, SEED_CODE_PREFIX};

const DISCIPLINES: [&str; 8] = [
    "Computer Science",
    "Mechanical Engineering",
    "Economics",
    "Biology",
    "Mathematics",
    "Architecture",
    "Law",
    "Psychology",
];

fn title_case(words: Vec<String>) -> String {
    words
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn generate_degrees(count: usize, run_tag: &str) -> Vec<DegreeSeed> {
    (0..count)
        .map(|idx| DegreeSeed {
            code: format!("{}{}-D{:02}", SEED_CODE_PREFIX, run_tag, idx + 1),
            name: format!("Bachelor of {}", DISCIPLINES[idx % DISCIPLINES.len()]),
            duration_years: (3..=5i32).fake(),
        })
        .collect()
}

pub fn generate_courses(degrees: &[(i64, String)], per_degree: usize) -> Vec<CourseSeed> {
    degrees
        .par_iter()
        .flat_map(|(degree_id, degree_code)| {
            (0..per_degree)
                .map(|idx| CourseSeed {
                    degree_id: *degree_id,
                    code: format!("{}-C{:03}", degree_code, idx + 1),
                    title: title_case(Words(2..4).fake()),
                    credits: (2..=6i32).fake(),
                    semester: (idx / 4 + 1) as i32,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_books(count: usize, run_tag: &str) -> Vec<BookSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| BookSeed {
            isbn: format!("{}{}-{:06}", SEED_CODE_PREFIX, run_tag, idx + 1),
            title: title_case(Words(1..5).fake()),
            author: Name().fake(),
            copies: (1..=5i32).fake(),
        })
        .collect()
}

/// Inserts degrees and returns `(id, code)` pairs.
pub async fn seed_degrees(
    db: &PgPool,
    count: usize,
    run_tag: &str,
) -> anyhow::Result<Vec<(i64, String)>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} degrees...", count);

    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(count);

    for degree in generate_degrees(count, run_tag) {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO degrees (code, name, duration_years) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&degree.code)
        .bind(&degree.name)
        .bind(degree.duration_years)
        .fetch_one(&mut *tx)
        .await?;
        inserted.push((id, degree.code));
    }

    tx.commit().await?;
    println!("   ✓ Inserted {} degrees in {:?}", inserted.len(), start_time.elapsed());

    Ok(inserted)
}

pub async fn seed_courses(
    db: &PgPool,
    degrees: &[(i64, String)],
    per_degree: usize,
) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    let courses = generate_courses(degrees, per_degree);
    println!("📚 Seeding {} courses...", courses.len());

    let mut tx = db.begin().await?;
    let mut total = 0;

    // 5 params per course
    for chunk in courses.chunks(1000) {
        let mut query = String::from(
            "INSERT INTO courses (degree_id, code, title, credits, semester) VALUES ",
        );
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            let p = i * 5;
            query.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${})",
                p + 1,
                p + 2,
                p + 3,
                p + 4,
                p + 5
            ));
        }

        let mut q = sqlx::query(&query);
        for course in chunk {
            q = q
                .bind(course.degree_id)
                .bind(&course.code)
                .bind(&course.title)
                .bind(course.credits)
                .bind(course.semester);
        }
        total += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    println!("   ✓ Inserted {} courses in {:?}", total, start_time.elapsed());

    Ok(total)
}

pub async fn seed_books(db: &PgPool, count: usize, run_tag: &str) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("📖 Seeding {} library books...", count);

    let books = generate_books(count, run_tag);
    let mut tx = db.begin().await?;
    let mut total = 0;

    for chunk in books.chunks(1000) {
        let mut query = String::from(
            "INSERT INTO library_books (isbn, title, author, total_copies, available_copies) VALUES ",
        );
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            let p = i * 4;
            query.push_str(&format!("(${}, ${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4, p + 4));
        }

        let mut q = sqlx::query(&query);
        for book in chunk {
            q = q
                .bind(&book.isbn)
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.copies);
        }
        total += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    println!("   ✓ Inserted {} books in {:?}", total, start_time.elapsed());

    Ok(total)
}
