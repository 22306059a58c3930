//! Help overlay: keybinding table.

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::render::centered_rect;

const BINDINGS: [(&str, &str); 8] = [
    ("Tab / j / ↓", "Next row"),
    ("S-Tab / k / ↑", "Previous row"),
    ("l / →", "Next title in row"),
    ("h / ←", "Previous title in row"),
    ("Enter", "Show details"),
    ("Esc / b", "Close details"),
    ("?", "Toggle this help"),
    ("q / Ctrl+c", "Quit"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame) {
    let overlay = centered_rect(60, 60, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows: Vec<Row> = BINDINGS
        .iter()
        .map(|(key, action)| Row::new(vec![format!("  {}", key), action.to_string()]))
        .collect();

    let widths = [Constraint::Length(18), Constraint::Min(20)];

    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);
}
