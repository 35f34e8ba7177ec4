use axum::{
    Router,
    routing::{patch, post},
};

use super::controller::{create_admission, decide_admission, get_admissions};
use crate::state::AppState;

pub fn init_admissions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_admission).get(get_admissions))
        .route("/{id}", patch(decide_admission))
}
