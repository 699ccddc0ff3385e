use crate::theme::Theme;
use mainline_core::state::{AppState, Mode};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key hints for a mode, as (key, description) pairs
pub fn hints_for(mode: Mode) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::ChooseAction => &[("↑/↓", "move"), ("enter", "select"), ("q", "quit")],
        Mode::ChooseRepositories => &[
            ("↑/↓", "move"),
            ("space", "toggle"),
            ("a", "toggle all"),
            ("enter", "confirm"),
            ("esc", "back"),
            ("q", "quit"),
        ],
        Mode::EnterBranchName => &[("enter", "run"), ("esc", "back")],
        Mode::Processing => &[],
        Mode::ShowResults => &[("↑/↓", "scroll"), ("q", "quit")],
    }
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, description)) in hints_for(state.mode).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(theme.muted)));
        }
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(theme.hint)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {description}"),
            Style::default().fg(theme.muted),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
