use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::app::App;

/// Render the countdown, the "Open payment" button and, once something is
/// selected, the "Finish" button.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let [headline_area, buttons_area, footer_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .areas(area);

    let headline = Paragraph::new(format!(
        "You have only {} seconds left to get the discount",
        app.flow.countdown_seconds()
    ))
    .style(
        Style::default()
            .fg(theme.headline)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    let headline_rows = Layout::vertical([Constraint::Length(2)])
        .flex(Flex::Center)
        .split(headline_area)[0];
    f.render_widget(headline, headline_rows);

    let mut buttons = vec![Line::from(Span::styled("  Open payment  ", theme.button()))];
    if app.flow.can_finish() {
        buttons.push(Line::from(""));
        buttons.push(Line::from(Span::styled("     Finish     ", theme.button())));
    }
    f.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Center),
        buttons_area,
    );

    let mut hints = vec![Span::styled("Enter: open payment", Style::default().fg(theme.dim))];
    if app.flow.can_finish() {
        hints.push(Span::styled("  f: finish", Style::default().fg(theme.dim)));
    }
    hints.push(Span::styled("  q: quit", Style::default().fg(theme.dim)));
    f.render_widget(
        Paragraph::new(Line::from(hints)).alignment(Alignment::Center),
        footer_area,
    );
}
