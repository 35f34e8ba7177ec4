use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{checkout_book, get_loans, get_my_loans, return_loan, search_books};
use crate::state::AppState;

pub fn init_library_router() -> Router<AppState> {
    Router::new()
        .route("/books", get(search_books))
        .route("/loans", get(get_loans).post(checkout_book))
        .route("/loans/me", get(get_my_loans))
        .route("/loans/{id}/return", post(return_loan))
}
