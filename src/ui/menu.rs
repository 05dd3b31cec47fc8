use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::db::progress::RunSummary;
use crate::ui::layout::calculate_menu_chunks;
use crate::ui::sessions::format_run_status;
use crate::utils::truncate_string;

const NAME_WIDTH: usize = 28;

fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn category_line<'a>(name: &str, run: Option<&RunSummary>) -> Line<'a> {
    let name = truncate_string(name, NAME_WIDTH);
    let mut spans = vec![Span::from(format!("{:<width$}", name, width = NAME_WIDTH))];
    match run {
        Some(run) => spans.push(Span::styled(
            format!("  {}", format_run_status(run)),
            Style::default().fg(if run.completed_at.is_some() {
                Color::Green
            } else {
                Color::Yellow
            }),
        )),
        None => spans.push(Span::styled(
            "  not started",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    }
    Line::from(spans)
}

pub fn draw_menu(
    f: &mut Frame,
    categories: &[String],
    selected_index: usize,
    runs: &[RunSummary],
    workbook: &str,
) {
    let layout = calculate_menu_chunks(f.area());

    let title = Paragraph::new("Spelling Drill")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.title_area);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!("Categories - {}", workbook));

    if categories.is_empty() {
        let empty = List::new(vec![ListItem::new("No categories found").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )])
        .block(list_block);
        f.render_widget(empty, layout.list_area);
    } else {
        let items: Vec<ListItem> = categories
            .iter()
            .map(|name| {
                let run = runs.iter().find(|run| &run.category == name);
                ListItem::new(category_line(name, run))
            })
            .collect();

        let list = List::new(items).block(list_block).highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
        let mut state = ListState::default().with_selected(Some(selected_index));
        f.render_stateful_widget(list, layout.list_area, &mut state);
    }

    let help_text = vec![Line::from(vec![
        key_span("↑/↓"),
        Span::from(" Navigate  "),
        key_span("Enter"),
        Span::from(" Start  "),
        key_span("r"),
        Span::from(" Reload  "),
        key_span("q/Ctrl+C"),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
