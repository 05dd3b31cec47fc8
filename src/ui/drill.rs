use crate::models::AnswerState;
use crate::session::{DrillSession, OPTION_COLUMNS};
use crate::ui::layout::{calculate_drill_chunks, calculate_option_grid};
use crate::utils::is_vowel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub const VOWEL_COLOR: Color = Color::Rgb(255, 69, 0);
pub const CONSONANT_COLOR: Color = Color::Rgb(100, 149, 237);

/// One span per character, vowels and consonants in their own colours.
pub fn colored_segment(text: &str) -> Line<'static> {
    let spans: Vec<Span<'static>> = text
        .chars()
        .map(|c| {
            let color = if is_vowel(c) {
                VOWEL_COLOR
            } else {
                CONSONANT_COLOR
            };
            Span::styled(
                c.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    Line::from(spans)
}

fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

pub fn draw_drill(f: &mut Frame, session: &DrillSession, sound_enabled: bool) {
    let layout = calculate_drill_chunks(f.area());
    let correct = session.answer_state == AnswerState::Correct;

    let progress = format!(
        "{} - word {} / {} - correct {}/{}",
        session.category,
        (session.current_index + 1).min(session.total()),
        session.total(),
        session.correct_count,
        session.total()
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut prompt = Text::default();
    if let Some(word) = session.current_word() {
        prompt.push_line(Line::from(Span::styled(
            word.translation.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        prompt.push_line(Line::from(""));
        prompt.push_line(Line::from(Span::styled(
            word.syllables.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let sound_title = if sound_enabled { "Sound: on" } else { "Sound: off" };
    let prompt = Paragraph::new(prompt).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Word")
            .title(Line::from(sound_title).right_aligned()),
    );
    f.render_widget(prompt, layout.prompt_area);

    let (answer_text, answer_style) = if correct {
        (
            format!("{}  ✓", session.input),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else if session.input.is_empty() {
        (
            "[Type or pick segments...]".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (session.input.clone(), Style::default())
    };
    let answer_border = if correct {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let answer = Paragraph::new(answer_text).style(answer_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(answer_border)
            .title(if correct { "Correct!" } else { "Your Answer" }),
    );
    f.render_widget(answer, layout.answer_area);

    if !correct {
        f.set_cursor_position((
            answer_cursor_x(layout.answer_area, &session.input),
            layout.answer_area.y + 1,
        ));
    }

    draw_options(f, session, layout.options_area);

    let help_text = vec![
        Line::from(vec![
            key_span("1-9,0"),
            Span::from(" Pick  "),
            key_span("←↑↓→"),
            Span::from(" Move  "),
            key_span("Enter"),
            Span::from(" Pick selected  "),
            key_span("Esc"),
            Span::from(" Back"),
        ]),
        Line::from(vec![
            key_span("Tab"),
            Span::from(" Hint  "),
            key_span("Ctrl+L"),
            Span::from(" Clear  "),
            key_span("Ctrl+P"),
            Span::from(" Replay  "),
            key_span("Ctrl+S"),
            Span::from(" Sound  "),
            key_span("Ctrl+C"),
            Span::from(" Exit App"),
        ]),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

/// Cursor column after `input` inside a bordered box, pinned to the right edge.
fn answer_cursor_x(area: Rect, input: &str) -> u16 {
    let width = u16::try_from(input.width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(width)
        .min(area.right().saturating_sub(2))
}

fn draw_options(f: &mut Frame, session: &DrillSession, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Options");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cells = calculate_option_grid(inner, session.options.len(), OPTION_COLUMNS);
    for (i, (option, cell)) in session.options.iter().zip(cells).enumerate() {
        let selected = i == session.selected_option;
        let border_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let label = (i + 1) % 10;
        let button = Paragraph::new(colored_segment(option))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(label.to_string()),
            );
        f.render_widget(button, cell);
    }
}
