//! Detail overlay for the selected title.
//!
//! Only drawn when a [`DetailSnapshot`] exists; while the fetch is in flight
//! the status bar carries the loading indicator instead.

use crate::api::{image_url, Genre, ImageSize, MediaDetail, MovieDetail, TvDetail};
use crate::detail::DetailSnapshot;
use crate::util::{format_runtime, release_year, sanitize};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::carousel::rating_label;
use super::render::centered_rect;

/// Render the overlay centered over the listing view.
pub fn render(f: &mut Frame, snapshot: &DetailSnapshot, image_base: &str) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let kind = match snapshot.details {
        MediaDetail::Movie(_) => "Movie",
        MediaDetail::Tv(_) => "TV",
    };
    let paragraph = Paragraph::new(detail_lines(snapshot, image_base))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} (Esc to close) ", kind)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, overlay);
}

/// Overlay body, branching on media type.
pub(super) fn detail_lines(snapshot: &DetailSnapshot, image_base: &str) -> Vec<Line<'static>> {
    let mut lines = match &snapshot.details {
        MediaDetail::Movie(movie) => movie_header(movie),
        MediaDetail::Tv(tv) => tv_header(tv),
    };

    let (genres, overview) = match &snapshot.details {
        MediaDetail::Movie(m) => (&m.genres, m.overview.as_deref()),
        MediaDetail::Tv(t) => (&t.genres, t.overview.as_deref()),
    };

    if !genres.is_empty() {
        lines.push(labelled("Genres", genre_names(genres)));
    }

    lines.push(Line::from(""));
    match overview.filter(|o| !o.trim().is_empty()) {
        Some(text) => lines.push(Line::from(sanitize(text).into_owned())),
        None => lines.push(Line::from(Span::styled(
            "No synopsis available.",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    if !snapshot.cast_names.is_empty() {
        lines.push(Line::from(""));
        let cast: Vec<String> = snapshot
            .cast_names
            .iter()
            .map(|n| sanitize(n).into_owned())
            .collect();
        lines.push(labelled("Cast", cast.join(", ")));
    }

    if let MediaDetail::Tv(tv) = &snapshot.details {
        let seasons = tv.listed_seasons();
        if !seasons.is_empty() {
            lines.push(Line::from(""));
            lines.push(heading("Seasons"));
            for season in seasons {
                let mut entry = format!("  {}", sanitize(&season.name));
                if let Some(count) = season.episode_count {
                    entry.push_str(&format!(" · {} episodes", count));
                }
                if let Some(year) = release_year(season.air_date.as_deref()) {
                    entry.push_str(&format!(" ({})", year));
                }
                lines.push(Line::from(entry));
                if let Some(url) =
                    image_url(image_base, ImageSize::W154, season.poster_path.as_deref())
                {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", url),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
    }

    let images = [
        ("Poster", ImageSize::W342, snapshot.details.poster_path()),
        ("Backdrop", ImageSize::Original, snapshot.details.backdrop_path()),
    ];
    let mut first_image = true;
    for (label, size, path) in images {
        if let Some(url) = image_url(image_base, size, path) {
            if first_image {
                lines.push(Line::from(""));
                first_image = false;
            }
            lines.push(Line::from(Span::styled(
                format!("{}: {}", label, url),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines
}

fn movie_header(movie: &MovieDetail) -> Vec<Line<'static>> {
    let mut lines = title_lines(&movie.title, movie.tagline.as_deref());

    let mut facts = Vec::new();
    if let Some(date) = movie.release_date.as_deref().filter(|d| !d.is_empty()) {
        facts.push(format!("Released {}", date));
    }
    if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
        facts.push(format_runtime(runtime));
    }
    if let Some(rating) = rating_with_votes(movie.vote_average, movie.vote_count) {
        facts.push(rating);
    }
    lines.push(facts_line(facts));
    lines
}

fn tv_header(tv: &TvDetail) -> Vec<Line<'static>> {
    let mut lines = title_lines(&tv.name, tv.tagline.as_deref());

    let mut facts = Vec::new();
    if let Some(date) = tv.first_air_date.as_deref().filter(|d| !d.is_empty()) {
        facts.push(format!("First aired {}", date));
    }
    if let Some(n) = tv.number_of_seasons {
        facts.push(plural(n, "season"));
    }
    if let Some(n) = tv.number_of_episodes {
        facts.push(plural(n, "episode"));
    }
    if let Some(rating) = rating_with_votes(tv.vote_average, tv.vote_count) {
        facts.push(rating);
    }
    lines.push(facts_line(facts));
    lines
}

fn title_lines(name: &str, tagline: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        sanitize(name).into_owned(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(tagline) = tagline.filter(|t| !t.trim().is_empty()) {
        lines.push(Line::from(Span::styled(
            sanitize(tagline).into_owned(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn facts_line(facts: Vec<String>) -> Line<'static> {
    Line::from(Span::styled(
        facts.join(" • "),
        Style::default().fg(Color::Gray),
    ))
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn labelled(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn genre_names(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| sanitize(&g.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn rating_with_votes(average: Option<f64>, count: Option<u64>) -> Option<String> {
    let rating = rating_label(average)?;
    Some(match count {
        Some(n) if n > 0 => format!("{} ({} votes)", rating, n),
        _ => rating,
    })
}

fn plural(n: u32, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Season;
    use ratatui::{backend::TestBackend, Terminal};

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

    fn season(name: &str, number: u32) -> Season {
        Season {
            name: name.to_string(),
            season_number: number,
            episode_count: Some(10),
            air_date: Some("2015-04-01".to_string()),
            poster_path: None,
        }
    }

    fn tv_snapshot(seasons: Vec<Season>, number_of_seasons: u32) -> DetailSnapshot {
        DetailSnapshot {
            details: MediaDetail::Tv(TvDetail {
                id: 1399,
                name: "Dragon Keep".to_string(),
                overview: Some("Houses fight over a chair.".to_string()),
                tagline: None,
                first_air_date: Some("2011-04-17".to_string()),
                number_of_seasons: Some(number_of_seasons),
                number_of_episodes: Some(73),
                episode_run_time: vec![60],
                genres: vec![Genre {
                    id: 18,
                    name: "Drama".to_string(),
                }],
                vote_average: Some(8.4),
                vote_count: Some(21000),
                poster_path: Some("/keep.jpg".to_string()),
                backdrop_path: None,
                seasons,
            }),
            cast_names: vec!["Alice".to_string(), "Bob".to_string()],
        }
    }

    fn movie_snapshot() -> DetailSnapshot {
        DetailSnapshot {
            details: MediaDetail::Movie(MovieDetail {
                id: 27205,
                title: "Dream Heist".to_string(),
                overview: Some("A thief who steals secrets.".to_string()),
                tagline: Some("Your mind is the scene of the crime.".to_string()),
                release_date: Some("2010-07-15".to_string()),
                runtime: Some(148),
                genres: vec![
                    Genre {
                        id: 28,
                        name: "Action".to_string(),
                    },
                    Genre {
                        id: 878,
                        name: "Science Fiction".to_string(),
                    },
                ],
                vote_average: Some(8.37),
                vote_count: Some(35000),
                poster_path: None,
                backdrop_path: None,
            }),
            cast_names: vec!["Leo".to_string()],
        }
    }

    fn text_of(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(snapshot: &DetailSnapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
        terminal
            .draw(|f| render(f, snapshot, IMAGE_BASE))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_movie_lines() {
        let text = text_of(&detail_lines(&movie_snapshot(), IMAGE_BASE));
        assert!(text.contains("Dream Heist"));
        assert!(text.contains("Your mind is the scene of the crime."));
        assert!(text.contains("Released 2010-07-15 • 2h 28m • ★ 8.4 (35000 votes)"));
        assert!(text.contains("Genres: Action, Science Fiction"));
        assert!(text.contains("Cast: Leo"));
        assert!(!text.contains("Seasons"));
        // No poster path, no URL
        assert!(!text.contains("Poster:"));
    }

    #[test]
    fn test_tv_lines_exclude_specials() {
        let snapshot = tv_snapshot(
            vec![season("Specials", 0), season("Season 1", 1), season("Season 2", 2)],
            2,
        );
        let text = text_of(&detail_lines(&snapshot, IMAGE_BASE));
        assert!(text.contains("First aired 2011-04-17 • 2 seasons • 73 episodes"));
        assert!(text.contains("Season 1 · 10 episodes (2015)"));
        assert!(text.contains("Season 2"));
        assert!(!text.contains("Specials"));
        assert!(text.contains("Poster: https://image.tmdb.org/t/p/w342/keep.jpg"));
    }

    #[test]
    fn test_season_posters_and_backdrop_urls() {
        let mut seasons = vec![season("Season 1", 1), season("Season 2", 2)];
        seasons[1].poster_path = Some("/s2.jpg".to_string());
        let mut snapshot = tv_snapshot(seasons, 2);
        if let MediaDetail::Tv(tv) = &mut snapshot.details {
            tv.backdrop_path = Some("/wide.jpg".to_string());
        }

        let text = text_of(&detail_lines(&snapshot, IMAGE_BASE));
        assert!(text.contains("    https://image.tmdb.org/t/p/w154/s2.jpg"));
        assert_eq!(text.matches("/w154/").count(), 1);
        assert!(text.contains("Backdrop: https://image.tmdb.org/t/p/original/wide.jpg"));
    }

    #[test]
    fn test_cast_and_genre_names_are_sanitized() {
        let mut snapshot = movie_snapshot();
        snapshot.cast_names = vec!["Le\x1b[31mo".to_string()];
        if let MediaDetail::Movie(m) = &mut snapshot.details {
            m.genres[0].name = "Act\u{7}ion".to_string();
        }

        let text = text_of(&detail_lines(&snapshot, IMAGE_BASE));
        assert!(text.contains("Cast: Leo"));
        assert!(text.contains("Genres: Action, Science Fiction"));
        assert!(!text.contains('\u{1b}'));
        assert!(!text.contains('\u{7}'));
    }

    #[test]
    fn test_single_season_has_no_list() {
        let snapshot = tv_snapshot(vec![season("Season 1", 1)], 1);
        let text = text_of(&detail_lines(&snapshot, IMAGE_BASE));
        assert!(text.contains("1 season"));
        assert!(!text.contains("Seasons"));
    }

    #[test]
    fn test_missing_overview_placeholder() {
        let mut snapshot = movie_snapshot();
        if let MediaDetail::Movie(m) = &mut snapshot.details {
            m.overview = Some("   ".to_string());
        }
        let text = text_of(&detail_lines(&snapshot, IMAGE_BASE));
        assert!(text.contains("No synopsis available."));
    }

    #[test]
    fn test_overlay_renders_into_buffer() {
        let snapshot = tv_snapshot(
            vec![season("Specials", 0), season("Season 1", 1), season("Season 2", 2)],
            2,
        );
        let screen = draw(&snapshot);
        assert!(screen.contains("TV (Esc to close)"));
        assert!(screen.contains("Dragon Keep"));
        assert!(screen.contains("Cast: Alice, Bob"));
        assert!(!screen.contains("Specials"));
    }
}
