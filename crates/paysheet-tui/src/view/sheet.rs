use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use super::{spinner_char, truncate};
use crate::app::{App, InputMode};

/// Render the payment sheet over the main screen: search bar, then either the
/// loader or the filtered list with a checkmark on the selected row.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = sheet_rect(f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Payment info ");
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let [search_area, list_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    render_search_bar(f, app, search_area);

    if app.flow.is_loading() {
        let loader = Line::from(vec![
            Span::styled(
                format!("{} ", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            ),
            Span::styled("Loading payment types...", Style::default().fg(theme.text)),
        ]);
        f.render_widget(Paragraph::new(loader), list_area);
    } else {
        render_list(f, app, list_area);
    }

    render_footer(f, app, footer_area);
}

fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = match app.input_mode {
        InputMode::Search => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(theme.text)),
            Span::styled(
                format!("{}_", app.search_input),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ]),
        InputMode::Normal if app.flow.search_text().is_empty() => {
            Line::from(Span::styled("/ Search", Style::default().fg(theme.dim)))
        }
        InputMode::Normal => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(theme.dim)),
            Span::styled(app.flow.search_text().to_string(), Style::default().fg(theme.text)),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let name_width = (area.width as usize).saturating_sub(4);

    let items: Vec<ListItem> = app
        .flow
        .filtered_items()
        .into_iter()
        .map(|item| {
            let mark = if app.flow.is_selected(item) {
                Span::styled(" \u{2713}", Style::default().fg(theme.checkmark))
            } else {
                Span::raw("  ")
            };
            let name = format!("{:<name_width$}", truncate(&item.name, name_width));
            ListItem::new(Line::from(vec![
                Span::styled(name, Style::default().fg(theme.text)),
                mark,
            ]))
        })
        .collect();

    if items.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No payment types",
                Style::default().fg(theme.dim),
            )),
            area,
        );
        return;
    }

    let list = List::new(items).highlight_style(Style::default().bg(theme.highlight_bg));
    let mut state = ListState::default().with_selected(Some(app.list_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(app.theme.dim);
    let mut spans = vec![Span::styled("Space: select  /: search  r: refresh", dim)];
    if app.flow.can_confirm() {
        spans.push(Span::styled("  d: done", dim));
    }
    spans.push(Span::styled("  Esc: close", dim));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Sheet covers most of the terminal, leaving the countdown visible above it.
fn sheet_rect(area: Rect) -> Rect {
    let top = area.height / 4;
    Rect {
        x: area.x + area.width / 10,
        y: area.y + top,
        width: area.width - area.width / 5,
        height: area.height - top,
    }
}
