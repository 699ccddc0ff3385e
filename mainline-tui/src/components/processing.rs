use super::centered_rect;
use crate::theme::Theme;
use mainline_core::state::AppState;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::time::Instant;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MILLIS: u128 = 80;

fn spinner_frame(start: &Instant) -> &'static str {
    let ticks = start.elapsed().as_millis() / FRAME_MILLIS;
    let idx = usize::try_from(ticks % SPINNER_FRAMES.len() as u128).unwrap_or(0);
    SPINNER_FRAMES[idx]
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, start: &Instant) {
    let operation = state
        .operation
        .as_ref()
        .map_or_else(String::new, ToString::to_string);

    let text = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner_frame(start)),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "Running on {} repositories...",
                state.selection.count()
            )),
        ]),
        Line::from(Span::styled(operation, Style::default().fg(theme.muted))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let centered = centered_rect(60, 20, area);
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, centered);
}
