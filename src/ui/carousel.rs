//! Grid rows: a sliding window of title cards per section.

use crate::api::{image_url, ImageSize, Title};
use crate::app::{App, CatalogState};
use crate::catalog::Section;
use crate::util::{release_year, sanitize, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of one card including its gap.
const CARD_WIDTH: u16 = 24;

pub(super) fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// `"★ 7.8"`, or `None` for unrated titles.
pub(super) fn rating_label(vote_average: Option<f64>) -> Option<String> {
    vote_average
        .filter(|v| *v > 0.0)
        .map(|v| format!("★ {:.1}", v))
}

/// Render one grid row.
///
/// Records how many cards fit so navigation and auto-advance can page by
/// the visible window.
pub fn render(f: &mut Frame, app: &mut App, section: Section, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let idx = section.index();
    let focused = app.focus == section;
    let inner_width = area.width.saturating_sub(2);
    app.row_slots[idx] = usize::from((inner_width / CARD_WIDTH).max(1));
    if focused {
        app.ensure_cursor_visible(section);
    }

    let len = app.section(section).len();
    let heading = if len == 0 {
        format!(" {} ", section.label())
    } else {
        format!(" {} ({}) ", section.label(), len)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(heading);
    let poster = match app.focused_title() {
        Some(title) if focused => poster_url(app, title),
        _ => None,
    };
    if let Some(url) = poster {
        let max = usize::from(inner_width.saturating_sub(2));
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", truncate_to_width(&url, max)),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    if len == 0 {
        let text = match &app.catalog_state {
            CatalogState::Loading => "Loading...",
            _ => "No titles",
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let visible = app.visible_indices(section);
    let cursor = app.cursors[idx];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(CARD_WIDTH); visible.len()])
        .split(inner);

    let titles = app.section(section);
    for (cell, &i) in cells.iter().zip(&visible) {
        let selected = focused && i == cursor;
        let card = card_lines(app, &titles[i], cell.width.saturating_sub(1), selected);
        f.render_widget(Paragraph::new(card), *cell);
    }
}

/// Poster reference for the selected card.
fn poster_url(app: &App, title: &Title) -> Option<String> {
    image_url(
        &app.settings.image_base_url,
        ImageSize::W200,
        title.poster_path.as_deref(),
    )
}

fn card_lines(app: &App, title: &Title, width: u16, selected: bool) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let name = sanitize(&title.name);

    let mut name_style = Style::default().add_modifier(Modifier::BOLD);
    if selected {
        name_style = name_style.fg(Color::Black).bg(Color::Cyan);
    }

    let meta = [
        release_year(title.release_date.as_deref()).map(|y| y.to_string()),
        rating_label(title.vote_average),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    vec![
        Line::from(Span::styled(
            truncate_to_width(&name, width).into_owned(),
            name_style,
        )),
        Line::from(Span::styled(
            truncate_to_width(&meta, width).into_owned(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            truncate_to_width(&app.genre_label(title), width).into_owned(),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}
