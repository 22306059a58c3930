//! Genre id to name resolution for listing titles.

use crate::api::Genre;
use std::collections::HashMap;

/// Lookup table derived from the catalog's genre list.
///
/// Rebuilt wholesale whenever a new catalog snapshot is published; never
/// patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreIndex {
    names: HashMap<u32, String>,
}

impl GenreIndex {
    pub fn from_genres(genres: &[Genre]) -> Self {
        Self {
            names: genres.iter().map(|g| (g.id, g.name.clone())).collect(),
        }
    }

    /// Name for `id`, or `None` if the catalog does not know it.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Names for `ids` in input order, comma-joined, unknown ids skipped.
    pub fn label(&self, ids: &[u32]) -> String {
        ids.iter()
            .filter_map(|id| self.name(*id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One-shot form of [`GenreIndex::label`].
///
/// ```
/// use marquee::api::Genre;
/// use marquee::genre::resolve_genres;
///
/// let genres = vec![
///     Genre { id: 28, name: "Action".into() },
///     Genre { id: 12, name: "Adventure".into() },
/// ];
/// assert_eq!(resolve_genres(&genres, &[28, 99, 12]), "Action, Adventure");
/// ```
pub fn resolve_genres(genres: &[Genre], ids: &[u32]) -> String {
    GenreIndex::from_genres(genres).label(ids)
}
