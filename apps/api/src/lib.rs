pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
