use crate::session::DrillSession;
use crate::utils::centered_rect;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn draw_popup(f: &mut Frame, title: &str, color: Color, lines: Vec<Line<'_>>) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    title.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(popup, area);
}

fn dismiss_line<'a>(action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(action),
    ])
}

pub fn draw_error_popup(f: &mut Frame, message: &str) {
    draw_popup(
        f,
        "Error",
        Color::Red,
        vec![
            Line::from(""),
            Line::from(message),
            Line::from(""),
            dismiss_line(" Dismiss"),
        ],
    );
}

pub fn draw_completion(f: &mut Frame, session: &DrillSession) {
    draw_popup(
        f,
        "Finished",
        Color::Green,
        vec![
            Line::from(""),
            Line::from(format!("\"{}\" complete!", session.category)),
            Line::from(Span::styled(
                format!("Correct: {}/{}", session.correct_count, session.total()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            dismiss_line(" Back to categories"),
        ],
    );
}
