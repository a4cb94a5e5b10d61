// ==========================================
// Humidor Hub - Application layer
// ==========================================
// Wires the API layer to a database location
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
