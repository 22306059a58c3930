//! Detail loading and the selection state behind the detail overlay.
//!
//! Selecting a title starts a new *generation*. The loader task carries its
//! [`DetailRequest`] back with the result, and [`DetailState::apply`] drops
//! anything whose generation is no longer current. Selecting A then B
//! therefore always ends with B on screen, whichever response lands last.

use crate::api::{ApiError, CatalogClient, Credits, MediaDetail, MediaType};

/// Number of cast names kept for the overlay.
pub const TOP_CAST: usize = 5;

/// Everything the overlay shows for one title.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    pub details: MediaDetail,
    pub cast_names: Vec<String>,
}

impl DetailSnapshot {
    pub fn id(&self) -> u64 {
        self.details.id()
    }
}

/// First `limit` cast names in API order.
pub fn top_cast_names(credits: &Credits, limit: usize) -> Vec<String> {
    credits
        .cast
        .iter()
        .take(limit)
        .map(|c| c.name.clone())
        .collect()
}

/// Fetch the detail and credits records concurrently and join them.
///
/// Fails if either request fails; no partially populated snapshot is ever
/// produced.
pub async fn load_detail(
    client: &CatalogClient,
    media_type: MediaType,
    id: u64,
) -> Result<DetailSnapshot, ApiError> {
    let (details, credits) =
        tokio::try_join!(client.detail(media_type, id), client.credits(media_type, id))?;

    Ok(DetailSnapshot {
        details,
        cast_names: top_cast_names(&credits, TOP_CAST),
    })
}

/// Which title the user asked to see, and whether the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub selected_id: Option<u64>,
    pub media_type: MediaType,
    pub is_open: bool,
}

/// Ticket for one detail activation, echoed back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub id: u64,
    pub media_type: MediaType,
}

/// What [`DetailState::apply`] did with a result.
#[derive(Debug)]
pub enum DetailOutcome {
    /// The snapshot is now visible.
    Applied,
    /// The current request failed; the selection has been closed.
    Failed(ApiError),
    /// The response described a different title than the one requested;
    /// the selection has been closed.
    Mismatched,
    /// The result belonged to a superseded or closed selection and was dropped.
    Stale,
}

/// Selection plus the snapshot for it.
///
/// Holds the invariant that `snapshot` is only ever `Some` for the current,
/// open selection whose fetch succeeded.
#[derive(Debug, Default)]
pub struct DetailState {
    selection: SelectionState,
    generation: u64,
    snapshot: Option<DetailSnapshot>,
}

impl DetailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn snapshot(&self) -> Option<&DetailSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Open and waiting on a fetch.
    pub fn is_loading(&self) -> bool {
        self.selection.is_open && self.snapshot.is_none()
    }

    /// Start a new activation for `(id, media_type)`.
    ///
    /// Any previous snapshot is dropped immediately so the old title never
    /// shows while the new one loads. Re-selecting the same id also starts
    /// a fresh fetch.
    pub fn select(&mut self, id: u64, media_type: MediaType) -> DetailRequest {
        self.generation = self.generation.wrapping_add(1);
        self.snapshot = None;
        self.selection = SelectionState {
            selected_id: Some(id),
            media_type,
            is_open: true,
        };
        DetailRequest {
            generation: self.generation,
            id,
            media_type,
        }
    }

    /// Apply a loader result if it still belongs to the current selection.
    pub fn apply(
        &mut self,
        request: DetailRequest,
        result: Result<DetailSnapshot, ApiError>,
    ) -> DetailOutcome {
        let current = request.generation == self.generation
            && self.selection.is_open
            && self.selection.selected_id == Some(request.id);
        if !current {
            tracing::debug!(
                expected = self.generation,
                got = request.generation,
                id = request.id,
                "Ignoring stale detail load"
            );
            return DetailOutcome::Stale;
        }

        match result {
            Ok(snapshot)
                if snapshot.id() == request.id
                    && snapshot.details.media_type() == request.media_type =>
            {
                tracing::debug!(id = request.id, generation = request.generation, "Detail loaded");
                self.snapshot = Some(snapshot);
                DetailOutcome::Applied
            }
            Ok(snapshot) => {
                tracing::warn!(
                    requested = request.id,
                    requested_type = %request.media_type,
                    received = snapshot.id(),
                    received_type = %snapshot.details.media_type(),
                    "Detail response does not match request, discarding"
                );
                self.reset();
                DetailOutcome::Mismatched
            }
            Err(e) => {
                tracing::error!(id = request.id, media_type = %request.media_type, error = %e, "Failed to load details");
                self.reset();
                DetailOutcome::Failed(e)
            }
        }
    }

    /// Close the overlay and forget the snapshot.
    ///
    /// Bumps the generation so an in-flight load for the closed selection
    /// is discarded on arrival.
    pub fn close(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.reset();
    }

    fn reset(&mut self) {
        self.selection = SelectionState::default();
        self.snapshot = None;
    }
}
