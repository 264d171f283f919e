pub mod compare;
pub mod embed;
pub mod info;

use axum::Router;

use crate::state::AppState;

pub fn api_routes(state: AppState) -> Router {
    info::routes()
        .merge(embed::routes())
        .merge(compare::routes())
        .with_state(state)
}
