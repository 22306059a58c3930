use crate::app::{App, CatalogState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

use super::render::spinner;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.detail.is_loading() {
        Cow::Owned(format!("{} Loading details... [Esc] cancel", spinner(app)))
    } else if app.catalog_state == CatalogState::Loading {
        Cow::Owned(format!("{} Loading catalog...", spinner(app)))
    } else if app.detail.selection().is_open {
        Cow::Borrowed("[Esc/b]ack [?]help [q]uit")
    } else {
        Cow::Borrowed("[Tab/j/k]row [h/l]move [Enter]details [?]help [q]uit")
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}
