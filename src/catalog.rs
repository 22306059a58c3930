//! Catalog loading: the startup fan-out that fills the listing view.

use crate::api::{ApiError, CatalogClient, Genre, MediaType, Title};

/// The four listing rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    NowPlaying,
    TopRated,
    Popular,
    TvShows,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::NowPlaying,
        Section::TopRated,
        Section::Popular,
        Section::TvShows,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::NowPlaying => "Now Playing",
            Section::TopRated => "Top Rated",
            Section::Popular => "Popular",
            Section::TvShows => "TV Shows",
        }
    }

    /// Media type passed to the detail loader when a title in this row is
    /// selected.
    pub fn media_type(self) -> MediaType {
        match self {
            Section::TvShows => MediaType::Tv,
            _ => MediaType::Movie,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Section::NowPlaying => 0,
            Section::TopRated => 1,
            Section::Popular => 2,
            Section::TvShows => 3,
        }
    }

    pub fn next(self) -> Section {
        Section::ALL[(self.index() + 1) % Section::ALL.len()]
    }

    pub fn prev(self) -> Section {
        Section::ALL[(self.index() + Section::ALL.len() - 1) % Section::ALL.len()]
    }
}

/// Everything the listing view renders, fetched in one go.
///
/// Published wholesale. A reload replaces the whole snapshot; nothing is
/// merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub genres: Vec<Genre>,
    pub now_playing: Vec<Title>,
    pub top_rated: Vec<Title>,
    pub popular: Vec<Title>,
    pub tv_shows: Vec<Title>,
}

impl CatalogSnapshot {
    pub fn section(&self, section: Section) -> &[Title] {
        match section {
            Section::NowPlaying => &self.now_playing,
            Section::TopRated => &self.top_rated,
            Section::Popular => &self.popular,
            Section::TvShows => &self.tv_shows,
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }
}

/// Fetch the five catalog resources concurrently and join them.
///
/// All-or-nothing: the first failure fails the whole load, and the error
/// does not say which of the five requests it came from beyond its path.
/// List order is exactly what the API returned.
pub async fn load_catalog(client: &CatalogClient) -> Result<CatalogSnapshot, ApiError> {
    let (genres, now_playing, top_rated, popular, tv_shows) = tokio::try_join!(
        client.genres(),
        client.now_playing(),
        client.top_rated(),
        client.popular(),
        client.tv_popular(),
    )?;

    tracing::info!(
        genres = genres.len(),
        now_playing = now_playing.len(),
        top_rated = top_rated.len(),
        popular = popular.len(),
        tv_shows = tv_shows.len(),
        "Catalog loaded"
    );

    Ok(CatalogSnapshot {
        genres,
        now_playing,
        top_rated,
        popular,
        tv_shows,
    })
}
