//! Client for the TMDB-compatible catalog REST API.
//!
//! - [`client`] - authenticated, size-limited JSON `GET`s for the seven endpoints
//! - [`types`] - response schemas, validated at the client boundary
//! - [`image`] - image URL construction for the various placements
//!
//! # Example
//!
//! ```ignore
//! use marquee::api::{ApiConfig, CatalogClient, MediaType};
//!
//! let client = CatalogClient::new(config.api_config(token))?;
//! let popular = client.popular().await?;
//! let detail = client.detail(MediaType::Movie, popular[0].id).await?;
//! ```

mod client;
mod image;
mod types;

pub use client::{ApiConfig, ApiError, ApiErrorKind, CatalogClient, DEFAULT_REQUEST_TIMEOUT};
pub use image::{image_url, ImageSize};
pub use types::{
    CastMember, Credits, Genre, GenreListResponse, MediaDetail, MediaType, MovieDetail,
    PagedResponse, Season, Title, TvDetail, SPECIALS_SEASON,
};

/// Public TMDB v3 API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Public TMDB image CDN root (sizes are appended per placement).
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
