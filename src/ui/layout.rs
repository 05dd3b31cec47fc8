use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct DrillLayout {
    pub header_area: Rect,
    pub prompt_area: Rect,
    pub answer_area: Rect,
    pub options_area: Rect,
    pub help_area: Rect,
}

pub struct MenuLayout {
    pub title_area: Rect,
    pub list_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_drill_chunks(area: Rect) -> DrillLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    DrillLayout {
        header_area: chunks[0],
        prompt_area: chunks[1],
        answer_area: chunks[2],
        options_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_menu_chunks(area: Rect) -> MenuLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    MenuLayout {
        title_area: chunks[0],
        list_area: chunks[1],
        help_area: chunks[2],
    }
}

/// Splits `area` into a grid of `count` cells, `columns` per row, in row-major order.
pub fn calculate_option_grid(area: Rect, count: usize, columns: usize) -> Vec<Rect> {
    if count == 0 || columns == 0 {
        return Vec::new();
    }
    let rows = count.div_ceil(columns);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    let mut cells = Vec::with_capacity(count);
    for row_area in row_areas.iter() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);
        for cell in cols.iter() {
            if cells.len() == count {
                break;
            }
            cells.push(*cell);
        }
    }
    cells
}
