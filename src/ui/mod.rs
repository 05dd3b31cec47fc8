pub mod drill;
pub mod layout;
mod menu;
mod popup;
mod sessions;

use crate::app::App;
use crate::models::AppState;
use ratatui::Frame;

pub use drill::{colored_segment, draw_drill};
pub use layout::{calculate_drill_chunks, calculate_menu_chunks, calculate_option_grid};
pub use menu::draw_menu;
pub use popup::{draw_completion, draw_error_popup};
pub use sessions::{format_run_date, format_run_status};

/// Renders the current screen, with any error popup on top.
pub fn draw(f: &mut Frame, app: &App) {
    let workbook = app.config.workbook_path.display().to_string();
    match (app.state, app.session.as_ref()) {
        (AppState::Drill, Some(session)) => draw_drill(f, session, app.sound_enabled),
        (AppState::Completed, Some(session)) => {
            draw_drill(f, session, app.sound_enabled);
            draw_completion(f, session);
        }
        _ => draw_menu(
            f,
            &app.categories,
            app.selected_category,
            &app.runs,
            &workbook,
        ),
    }

    if let Some(error) = &app.error {
        draw_error_popup(f, error);
    }
}
