use crate::theme::Theme;
use mainline_core::{batch::BatchResult, state::AppState, switch::Outcome};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Collapse git's multi-line stderr into one display line
fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let empty = BatchResult::default();
    let result = state.batch.as_ref().unwrap_or(&empty);

    let name_width = result
        .entries()
        .iter()
        .map(|entry| entry.repo.name.chars().count())
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = result
        .entries()
        .iter()
        .map(|entry| {
            let name = format!("{:<name_width$}", entry.repo.name);
            let line = match &entry.outcome {
                Outcome::Success => Line::from(vec![
                    Span::styled("✓ ", Style::default().fg(theme.success)),
                    Span::raw(name),
                ]),
                Outcome::Failure { stage, message } => Line::from(vec![
                    Span::styled(
                        "✗ ",
                        Style::default()
                            .fg(theme.error)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(name),
                    Span::styled(format!("  {stage}: "), Style::default().fg(theme.error)),
                    Span::styled(one_line(message), Style::default().fg(theme.muted)),
                ]),
            };
            ListItem::new(line)
        })
        .collect();

    let border_color = if result.is_all_success() {
        theme.success
    } else {
        theme.error
    };
    let title = format!(
        " Results: {} succeeded, {} failed ",
        result.succeeded(),
        result.failed()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if !result.is_empty() {
        list_state.select(Some(state.cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::render_to_string;
    use mainline_core::{
        batch::{BatchOptions, run_batch},
        git::{
            Repo,
            mock::{GitStep, MockGitProvider},
        },
        state::Mode,
        switch::Operation,
    };
    use std::path::PathBuf;

    #[test]
    fn test_one_line_collapses_stderr() {
        assert_eq!(
            one_line("git pull origin main failed: error: conflict\n  hint: fix it\n\n"),
            "git pull origin main failed: error: conflict hint: fix it"
        );
    }

    #[test]
    fn test_draw_marks_each_repo() {
        let repos: Vec<Repo> = ["api", "web"]
            .iter()
            .map(|name| Repo {
                name: (*name).to_string(),
                path: PathBuf::from(format!("/src/{name}")),
            })
            .collect();
        let git = MockGitProvider::default().fail(
            &repos[1].path,
            GitStep::Fetch,
            "fatal: unable to access remote",
        );
        let batch = run_batch(&git, &repos, &Operation::SwitchToMain, &BatchOptions::default());

        let mut state = AppState::new(repos);
        state.mode = Mode::ShowResults;
        state.batch = Some(batch);
        let theme = Theme::default();

        let output = render_to_string(100, 6, |f| draw(f, f.area(), &state, &theme));
        assert!(output.contains("Results: 1 succeeded, 1 failed"), "{output}");
        assert!(output.contains("✓ api"), "{output}");
        let web_line = output.lines().find(|l| l.contains("web")).unwrap();
        assert!(web_line.contains("✗ web"), "{web_line}");
        assert!(web_line.contains("fetch: fatal: unable to access remote"), "{web_line}");
    }
}
