pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod reminders;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{load_reminders, load_tracker, resolve_reminders_path, resolve_tracker_path};
