/// Image sizes used by the different placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Hero backdrop
    W1280,
    /// Poster of the selected grid card
    W200,
    /// Detail overlay poster
    W342,
    /// Season posters in the detail overlay
    W154,
    /// Detail overlay backdrop
    Original,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::W1280 => "w1280",
            ImageSize::W200 => "w200",
            ImageSize::W342 => "w342",
            ImageSize::W154 => "w154",
            ImageSize::Original => "original",
        }
    }
}

/// Build `{base}/{size}{path}` for an image path taken verbatim from the API.
///
/// Returns `None` for a missing or empty path so callers never render a
/// broken URL.
///
/// ```
/// use marquee::api::{image_url, ImageSize};
///
/// assert_eq!(
///     image_url("https://image.tmdb.org/t/p", ImageSize::W200, Some("/abc.jpg")).as_deref(),
///     Some("https://image.tmdb.org/t/p/w200/abc.jpg"),
/// );
/// assert_eq!(image_url("https://image.tmdb.org/t/p", ImageSize::W200, None), None);
/// ```
pub fn image_url(base: &str, size: ImageSize, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}/{}{}", base, size.as_str(), path))
    } else {
        Some(format!("{}/{}/{}", base, size.as_str(), path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_each_size() {
        let cases = [
            (ImageSize::W1280, "https://image.tmdb.org/t/p/w1280/b.jpg"),
            (ImageSize::W200, "https://image.tmdb.org/t/p/w200/b.jpg"),
            (ImageSize::W342, "https://image.tmdb.org/t/p/w342/b.jpg"),
            (ImageSize::W154, "https://image.tmdb.org/t/p/w154/b.jpg"),
            (ImageSize::Original, "https://image.tmdb.org/t/p/original/b.jpg"),
        ];
        for (size, expected) in cases {
            assert_eq!(image_url(BASE, size, Some("/b.jpg")).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_missing_or_blank_path() {
        assert_eq!(image_url(BASE, ImageSize::W200, None), None);
        assert_eq!(image_url(BASE, ImageSize::W200, Some("")), None);
        assert_eq!(image_url(BASE, ImageSize::W200, Some("  ")), None);
    }

    #[test]
    fn test_trailing_slash_on_base() {
        assert_eq!(
            image_url("https://img.example/t/p/", ImageSize::W200, Some("/x.png")).as_deref(),
            Some("https://img.example/t/p/w200/x.png")
        );
    }
}
