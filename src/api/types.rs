//! Response schemas for the seven catalog endpoints.
//!
//! Every endpoint gets an explicit `serde` shape. Anything that does not
//! match is rejected at the client boundary as [`ApiError::Malformed`]
//! instead of surfacing later as a missing field.
//!
//! [`ApiError::Malformed`]: super::ApiError::Malformed

use serde::Deserialize;
use std::fmt;

/// Which half of the catalog a title belongs to.
///
/// Doubles as the first path segment of the detail and credits endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_path(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// `GET /genre/movie/list`
#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    pub genres: Vec<Genre>,
}

/// First page of a listing endpoint (`now_playing`, `top_rated`, `popular`,
/// `tv/popular`). Only `results` is used; pagination is not followed.
#[derive(Debug, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<T>,
}

/// A movie or TV show as returned by the listing endpoints.
///
/// Movies carry `title`/`release_date`, TV shows `name`/`first_air_date`;
/// both are folded into `name` and `release_date` here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTitle")]
pub struct Title {
    pub id: u64,
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genre_ids: Vec<u32>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Deserialize)]
struct RawTitle {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    vote_average: Option<f64>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

impl TryFrom<RawTitle> for Title {
    type Error = String;

    fn try_from(raw: RawTitle) -> Result<Self, Self::Error> {
        let name = raw
            .title
            .or(raw.name)
            .ok_or_else(|| format!("title {} has neither `title` nor `name`", raw.id))?;
        Ok(Title {
            id: raw.id,
            name,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            genre_ids: raw.genre_ids,
            vote_average: raw.vote_average,
            overview: raw.overview,
            release_date: raw.release_date.or(raw.first_air_date),
        })
    }
}

/// `GET /movie/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// `GET /tv/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TvDetail {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub first_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// Name the API gives the out-of-band season 0.
pub const SPECIALS_SEASON: &str = "Specials";

impl TvDetail {
    /// Seasons shown in the overlay's seasons list.
    ///
    /// Empty unless the show has more than one season. Entries named exactly
    /// `"Specials"` are always left out; everything else keeps API order.
    pub fn listed_seasons(&self) -> Vec<&Season> {
        let season_count = self
            .number_of_seasons
            .map(|n| n as usize)
            .unwrap_or(self.seasons.len());
        if season_count <= 1 {
            return Vec::new();
        }
        self.seasons
            .iter()
            .filter(|s| s.name != SPECIALS_SEASON)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Season {
    pub name: String,
    pub season_number: u32,
    pub episode_count: Option<u32>,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
}

/// Detail record for either media type.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaDetail {
    Movie(MovieDetail),
    Tv(TvDetail),
}

impl MediaDetail {
    pub fn id(&self) -> u64 {
        match self {
            MediaDetail::Movie(m) => m.id,
            MediaDetail::Tv(t) => t.id,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            MediaDetail::Movie(_) => MediaType::Movie,
            MediaDetail::Tv(_) => MediaType::Tv,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MediaDetail::Movie(m) => &m.title,
            MediaDetail::Tv(t) => &t.name,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            MediaDetail::Movie(m) => m.poster_path.as_deref(),
            MediaDetail::Tv(t) => t.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            MediaDetail::Movie(m) => m.backdrop_path.as_deref(),
            MediaDetail::Tv(t) => t.backdrop_path.as_deref(),
        }
    }
}

/// `GET /{media_type}/{id}/credits`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub order: Option<u32>,
}
