use crate::theme::Theme;
use mainline_core::state::AppState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let items: Vec<ListItem> = state
        .repos
        .iter()
        .enumerate()
        .map(|(idx, repo)| {
            let (mark, mark_style) = if state.selection.is_selected(idx) {
                ("[x] ", Style::default().fg(theme.success))
            } else {
                ("[ ] ", Style::default().fg(theme.muted))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, mark_style),
                Span::raw(&repo.name),
                Span::styled(
                    format!("  {}", repo.path.display()),
                    Style::default().fg(theme.muted),
                ),
            ]))
        })
        .collect();

    let title = format!(
        " {} · Selected: {}/{} ",
        state.action.label(),
        state.selection.count(),
        state.repos.len()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(theme.accent)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !state.repos.is_empty() {
        list_state.select(Some(state.cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}
