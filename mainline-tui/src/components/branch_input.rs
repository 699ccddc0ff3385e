use crate::theme::Theme;
use mainline_core::state::AppState;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VisibleTail {
    start: usize,
    cursor_col: u16,
}

/// The longest suffix of `text` that fits in `max_width` columns with room
/// left for the cursor after it. Never splits a grapheme.
fn visible_tail(text: &str, max_width: u16) -> VisibleTail {
    let max_cursor_col = usize::from(max_width).saturating_sub(1);

    let mut start = text.len();
    let mut width = 0;
    for (idx, grapheme) in text.grapheme_indices(true).rev() {
        let g_width = grapheme.width();
        if width + g_width > max_cursor_col {
            break;
        }
        width += g_width;
        start = idx;
    }

    VisibleTail {
        start,
        cursor_col: u16::try_from(width).unwrap_or(u16::MAX),
    }
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .split(area);

    let summary = Line::from(vec![
        Span::raw(" New branch for "),
        Span::styled(
            format!("{} selected repos", state.selection.count()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(", created from the freshly pulled main"),
    ]);
    f.render_widget(Paragraph::new(summary), chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" Branch name ")
        .border_style(Style::default().fg(theme.accent));
    let inner = input_block.inner(chunks[1]);

    if state.branch_name.is_empty() {
        let placeholder = Line::from(Span::styled(
            "Type a branch name...",
            Style::default().fg(theme.muted),
        ));
        f.render_widget(Paragraph::new(placeholder).block(input_block), chunks[1]);
        if inner.width > 0 && inner.height > 0 {
            f.set_cursor_position((inner.x, inner.y));
        }
    } else {
        let tail = visible_tail(&state.branch_name, inner.width);
        let content = Line::from(Span::raw(&state.branch_name[tail.start..]));
        f.render_widget(Paragraph::new(content).block(input_block), chunks[1]);
        if inner.width > 0 && inner.height > 0 {
            f.set_cursor_position((inner.x.saturating_add(tail.cursor_col), inner.y));
        }
    }
}
