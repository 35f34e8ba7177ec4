use anyhow::{Context, anyhow};
use portal_core::{AppError, PaginationMeta, PaginationParams};
use portal_db::is_foreign_key_violation;
use portal_models::{Book, BookSearchParams, CheckoutDto, Loan, LoanWithBook, PaginatedBooksResponse};
use sqlx::PgPool;
use tracing::instrument;

const BOOK_COLUMNS: &str = "id, isbn, title, author, total_copies, available_copies, created_at";
const LOAN_COLUMNS: &str = "id, book_id, student_id, borrowed_at, due_at, returned_at";

/// `%term%` with the term's own `%`, `_` and `\` matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub struct LibraryService;

impl LibraryService {
    /// Catalogue page, optionally filtered by a case-insensitive title/author match.
    #[instrument(skip(db))]
    pub async fn search_books(
        db: &PgPool,
        params: BookSearchParams,
    ) -> Result<PaginatedBooksResponse, AppError> {
        let pattern = params.q.as_deref().map(|q| contains_pattern(q.trim()));

        const FILTER: &str = "FROM library_books \
                              WHERE ($1::TEXT IS NULL \
                                     OR title ILIKE $1 ESCAPE '\\' \
                                     OR author ILIKE $1 ESCAPE '\\')";

        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) {FILTER}"))
            .bind(&pattern)
            .fetch_one(db)
            .await
            .context("Failed to count books")
            .map_err(AppError::database)?;

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} {FILTER} ORDER BY title, id LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch books")
        .map_err(AppError::database)?;

        Ok(PaginatedBooksResponse {
            data: books,
            meta: PaginationMeta::new(&params.pagination, total),
        })
    }

    /// First catalogue page with default pagination.
    pub async fn catalogue(db: &PgPool) -> Result<PaginatedBooksResponse, AppError> {
        Self::search_books(
            db,
            BookSearchParams {
                q: None,
                pagination: PaginationParams::default(),
            },
        )
        .await
    }

    #[instrument(skip(db))]
    pub async fn get_loans_for_student(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<LoanWithBook>, AppError> {
        sqlx::query_as::<_, LoanWithBook>(
            r#"SELECT l.id, l.book_id, b.title, b.author, l.borrowed_at, l.due_at, l.returned_at
               FROM library_loans l
               JOIN library_books b ON b.id = l.book_id
               WHERE l.student_id = $1
               ORDER BY l.returned_at IS NOT NULL, l.due_at"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch loans")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_loans(db: &PgPool, student_id: Option<i64>) -> Result<Vec<Loan>, AppError> {
        sqlx::query_as::<_, Loan>(&format!(
            "SELECT {LOAN_COLUMNS} FROM library_loans \
             WHERE ($1::BIGINT IS NULL OR student_id = $1) \
             ORDER BY borrowed_at DESC, id DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch loans")
        .map_err(AppError::database)
    }

    /// Lends one copy of a book. Fails with `409` when no copy is available.
    #[instrument(skip(db))]
    pub async fn checkout(db: &PgPool, dto: CheckoutDto) -> Result<Loan, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let reserved = sqlx::query_scalar::<_, i64>(
            r#"UPDATE library_books SET available_copies = available_copies - 1
               WHERE id = $1 AND available_copies > 0
               RETURNING id"#,
        )
        .bind(dto.book_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to reserve book copy")
        .map_err(AppError::database)?;

        if reserved.is_none() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM library_books WHERE id = $1)",
            )
            .bind(dto.book_id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to check book")
            .map_err(AppError::database)?;

            return Err(if exists {
                AppError::conflict(anyhow!("No copies of this book are available"))
            } else {
                AppError::not_found(anyhow!("Book not found"))
            });
        }

        let loan = sqlx::query_as::<_, Loan>(&format!(
            "INSERT INTO library_loans (book_id, student_id, due_at) \
             VALUES ($1, $2, NOW() + make_interval(days => $3)) \
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(dto.book_id)
        .bind(dto.student_id)
        .bind(dto.loan_days() as i32)
        .fetch_one(&mut *tx)
        .await;

        let loan = match loan {
            Ok(loan) => loan,
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(AppError::not_found(anyhow!("Student not found")));
            }
            Err(e) => {
                return Err(AppError::database(
                    anyhow::Error::new(e).context("Failed to create loan"),
                ));
            }
        };

        tx.commit()
            .await
            .context("Failed to commit checkout")
            .map_err(AppError::database)?;

        tracing::info!(loan_id = loan.id, book_id = loan.book_id, student_id = loan.student_id, "book checked out");
        Ok(loan)
    }

    /// Closes an open loan and puts the copy back on the shelf.
    #[instrument(skip(db))]
    pub async fn return_loan(db: &PgPool, id: i64) -> Result<Loan, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let returned = sqlx::query_as::<_, Loan>(&format!(
            "UPDATE library_loans SET returned_at = NOW() \
             WHERE id = $1 AND returned_at IS NULL \
             RETURNING {LOAN_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to return loan")
        .map_err(AppError::database)?;

        let Some(loan) = returned else {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM library_loans WHERE id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to check loan")
            .map_err(AppError::database)?;

            return Err(if exists {
                AppError::conflict(anyhow!("Loan has already been returned"))
            } else {
                AppError::not_found(anyhow!("Loan not found"))
            });
        };

        sqlx::query(
            r#"UPDATE library_books SET available_copies = LEAST(available_copies + 1, total_copies)
               WHERE id = $1"#,
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await
        .context("Failed to restock book")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit return")
            .map_err(AppError::database)?;

        Ok(loan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_plain_terms() {
        assert_eq!(contains_pattern("dune"), "%dune%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern("a_b"), r"%a\_b%");
        assert_eq!(contains_pattern(r"c:\x"), r"%c:\\x%");
    }
}
