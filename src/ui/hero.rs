use crate::api::{image_url, ImageSize, Title};
use crate::app::{App, CatalogState};
use crate::catalog::Section;
use crate::util::{release_year, sanitize, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::carousel::{border_style, rating_label};
use super::render::spinner;

/// Render the now-playing hero: one title at a time, full width.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let titles = app.section(Section::NowPlaying);
    let cursor = app.cursors[Section::NowPlaying.index()];
    let focused = app.focus == Section::NowPlaying;

    let heading = if titles.is_empty() {
        format!(" {} ", Section::NowPlaying.label())
    } else {
        format!(
            " {} ({}/{}) ",
            Section::NowPlaying.label(),
            cursor + 1,
            titles.len()
        )
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(heading);

    let Some(title) = titles.get(cursor) else {
        let text = match &app.catalog_state {
            CatalogState::Loading => format!("{} Loading catalog...", spinner(app)),
            CatalogState::Failed(_) => "Catalog unavailable".to_string(),
            CatalogState::Loaded => "Nothing playing right now".to_string(),
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let name = sanitize(&title.name);

    if let Some(url) = backdrop_url(app, title) {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", truncate_to_width(&url, inner_width.saturating_sub(2))),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut meta: Vec<String> = Vec::new();
    if let Some(year) = release_year(title.release_date.as_deref()) {
        meta.push(year.to_string());
    }
    if let Some(rating) = rating_label(title.vote_average) {
        meta.push(rating);
    }
    let genres = app.genre_label(title);
    if !genres.is_empty() {
        meta.push(genres);
    }

    let mut name_style = Style::default().add_modifier(Modifier::BOLD);
    if focused {
        name_style = name_style.fg(Color::Yellow);
    }

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&name, inner_width).into_owned(),
            name_style,
        )),
        Line::from(Span::styled(
            meta.join(" • "),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    if let Some(overview) = title.overview.as_deref().filter(|o| !o.trim().is_empty()) {
        lines.push(Line::from(sanitize(overview).into_owned()));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Backdrop reference for the hero slide.
fn backdrop_url(app: &App, title: &Title) -> Option<String> {
    image_url(
        &app.settings.image_base_url,
        ImageSize::W1280,
        title.backdrop_path.as_deref(),
    )
}
