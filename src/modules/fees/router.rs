use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_fee, get_fees, get_my_fees, pay_fee};
use crate::state::AppState;

pub fn init_fees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_fees).post(create_fee))
        .route("/me", get(get_my_fees))
        .route("/{id}/pay", post(pay_fee))
}
