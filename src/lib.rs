pub mod app;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod db;
pub mod deferred;
pub mod logger;
pub mod models;
pub mod options;
pub mod session;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use app::App;
pub use catalog::{list_categories, load_category, CatalogError};
pub use config::{Config, ConfigError};
pub use models::{AnswerState, AppState, Category, WordEntry};
pub use options::generate_options;
pub use session::{handle_drill_input, DrillSession};
pub use ui::{draw, draw_drill, draw_menu};
