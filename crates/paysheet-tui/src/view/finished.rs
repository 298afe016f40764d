use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::centered_rect;
use crate::theme::Theme;

/// Render the terminal screen that replaces everything once the flow finishes.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(area.width, 3, area);

    let lines = vec![
        Line::from("Congratulations").style(
            Style::default()
                .fg(theme.headline)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("q: quit").style(Style::default().fg(theme.dim)),
    ];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        popup,
    );
}
