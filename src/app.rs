use crate::api::{ApiError, CatalogClient, MediaType, Title};
use crate::catalog::{CatalogSnapshot, Section};
use crate::config::Config;
use crate::detail::{DetailOutcome, DetailRequest, DetailSnapshot, DetailState};
use crate::genre::GenreIndex;
use crate::util::sanitize;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

// ============================================================================
// Display Settings
// ============================================================================

/// Presentation settings lifted out of [`Config`].
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub image_base_url: String,
    pub hero_interval: Duration,
    pub carousel_interval: Duration,
}

impl DisplaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_base_url: config.image_base_url.clone(),
            hero_interval: config.hero_interval(),
            carousel_interval: config.carousel_interval(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ============================================================================
// Load State and Event Types
// ============================================================================

/// Where the one-shot catalog load stands.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Loaded,
    Failed(String),
}

/// Events from background tasks
pub enum AppEvent {
    /// The startup catalog fan-out finished.
    CatalogLoaded(Result<CatalogSnapshot, ApiError>),
    /// A detail fetch finished.
    ///
    /// `request` is the ticket handed out when the title was selected; it
    /// decides whether the result is still wanted.
    DetailLoaded {
        request: DetailRequest,
        result: Result<DetailSnapshot, ApiError>,
    },
    /// A background task panicked.
    ///
    /// Detail loads attach their request so a panic from a superseded
    /// load cannot close the current overlay.
    TaskPanicked {
        task: &'static str,
        error: String,
        request: Option<DetailRequest>,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub client: Arc<CatalogClient>,
    pub settings: DisplaySettings,

    // Data
    /// Current catalog, replaced wholesale on publish.
    pub catalog: Arc<CatalogSnapshot>,
    /// Rebuilt from `catalog.genres` on every publish.
    pub genre_index: GenreIndex,
    pub catalog_state: CatalogState,

    // Listing state
    pub focus: Section,
    /// Cursor per section, indexed by `Section::index`. For the hero row
    /// this is the slide on screen.
    pub cursors: [usize; 4],
    /// First visible card per grid row.
    pub row_offsets: [usize; 4],
    /// Cards that fit in each row at the last render.
    pub row_slots: [usize; 4],
    last_hero_advance: Instant,
    last_row_advance: Instant,

    // Detail overlay
    pub detail: DetailState,
    /// Handle to the in-flight detail load, aborted when superseded.
    pub detail_handle: Option<tokio::task::JoinHandle<()>>,

    /// Status message with set time; `Cow` avoids allocating literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_help: bool,
    pub spinner_frame: usize,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(client: Arc<CatalogClient>, settings: DisplaySettings) -> Self {
        let now = Instant::now();
        Self {
            client,
            settings,
            catalog: Arc::new(CatalogSnapshot::default()),
            genre_index: GenreIndex::default(),
            catalog_state: CatalogState::Loading,
            focus: Section::NowPlaying,
            cursors: [0; 4],
            row_offsets: [0; 4],
            row_slots: [1; 4],
            last_hero_advance: now,
            last_row_advance: now,
            detail: DetailState::new(),
            detail_handle: None,
            status_message: None,
            show_help: false,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    // ------------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------------

    /// Replace the catalog and rebuild everything derived from it.
    pub fn publish_catalog(&mut self, snapshot: CatalogSnapshot) {
        self.genre_index = GenreIndex::from_genres(&snapshot.genres);
        self.catalog = Arc::new(snapshot);
        self.catalog_state = CatalogState::Loaded;
        self.cursors = [0; 4];
        self.row_offsets = [0; 4];
        let now = Instant::now();
        self.last_hero_advance = now;
        self.last_row_advance = now;
        self.needs_redraw = true;
    }

    /// Record a failed catalog load. The current snapshot (possibly empty)
    /// stays as it is.
    pub fn catalog_failed(&mut self, error: &ApiError) {
        tracing::error!(error = %error, kind = ?error.kind(), "Failed to load catalog");
        self.catalog_state = CatalogState::Failed(error.to_string());
        self.set_status(format!("Failed to load catalog: {}", error));
    }

    pub fn section(&self, section: Section) -> &[Title] {
        self.catalog.section(section)
    }

    pub fn focused_title(&self) -> Option<&Title> {
        self.section(self.focus).get(self.cursors[self.focus.index()])
    }

    /// Genre label for a listing title, e.g. `"Action, Adventure"`.
    pub fn genre_label(&self, title: &Title) -> String {
        sanitize(&self.genre_index.label(&title.genre_ids)).into_owned()
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.ensure_cursor_visible(self.focus);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        self.ensure_cursor_visible(self.focus);
    }

    pub fn cursor_right(&mut self) {
        let len = self.section(self.focus).len();
        if len == 0 {
            return;
        }
        let idx = self.focus.index();
        self.cursors[idx] = (self.cursors[idx] + 1) % len;
        self.ensure_cursor_visible(self.focus);
    }

    pub fn cursor_left(&mut self) {
        let len = self.section(self.focus).len();
        if len == 0 {
            return;
        }
        let idx = self.focus.index();
        self.cursors[idx] = (self.cursors[idx] + len - 1) % len;
        self.ensure_cursor_visible(self.focus);
    }

    /// Slide a grid row's window so its cursor is on screen.
    pub fn ensure_cursor_visible(&mut self, section: Section) {
        let idx = section.index();
        let len = self.section(section).len();
        let slots = self.row_slots[idx].max(1);
        if len <= slots {
            self.row_offsets[idx] = 0;
            return;
        }
        let cursor = self.cursors[idx].min(len - 1);
        let offset = self.row_offsets[idx].min(len - 1);
        let visible = (cursor + len - offset) % len < slots;
        if !visible {
            self.row_offsets[idx] = if cursor + slots > len {
                len - slots
            } else {
                cursor
            };
        }
    }

    /// Indices of the titles visible in a grid row, wrapping like an
    /// infinite carousel once the row is longer than its window.
    pub fn visible_indices(&self, section: Section) -> Vec<usize> {
        let idx = section.index();
        let len = self.section(section).len();
        let slots = self.row_slots[idx].max(1);
        if len <= slots {
            return (0..len).collect();
        }
        let offset = self.row_offsets[idx] % len;
        (0..slots).map(|i| (offset + i) % len).collect()
    }

    /// Advance the carousels that are due. Returns true if anything moved.
    ///
    /// The focused row and everything behind an open overlay hold still.
    pub fn advance_carousels(&mut self, now: Instant) -> bool {
        if self.detail.selection().is_open || self.show_help {
            return false;
        }
        let mut moved = false;

        if now.duration_since(self.last_hero_advance) >= self.settings.hero_interval {
            self.last_hero_advance = now;
            let len = self.catalog.now_playing.len();
            if self.focus != Section::NowPlaying && len > 1 {
                let idx = Section::NowPlaying.index();
                self.cursors[idx] = (self.cursors[idx] + 1) % len;
                moved = true;
            }
        }

        if now.duration_since(self.last_row_advance) >= self.settings.carousel_interval {
            self.last_row_advance = now;
            for section in [Section::TopRated, Section::Popular, Section::TvShows] {
                if section == self.focus {
                    continue;
                }
                let idx = section.index();
                let len = self.section(section).len();
                let slots = self.row_slots[idx].max(1);
                if len > slots {
                    self.row_offsets[idx] = (self.row_offsets[idx] + slots) % len;
                    moved = true;
                }
            }
        }

        moved
    }

    // ------------------------------------------------------------------------
    // Detail overlay
    // ------------------------------------------------------------------------

    /// Start a detail activation, aborting any load it supersedes.
    pub fn begin_detail(&mut self, id: u64, media_type: MediaType) -> DetailRequest {
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted superseded detail load");
        }
        let request = self.detail.select(id, media_type);
        tracing::debug!(id, media_type = %media_type, generation = request.generation, "Detail selected");
        request
    }

    /// Route a finished detail load through the generation guard.
    pub fn apply_detail(
        &mut self,
        request: DetailRequest,
        result: Result<DetailSnapshot, ApiError>,
    ) {
        let current = request.generation == self.detail.generation();
        match self.detail.apply(request, result) {
            DetailOutcome::Failed(e) => {
                self.set_status(format!("Failed to load details: {}", e));
            }
            DetailOutcome::Mismatched => {
                self.set_status(
                    "Failed to load details: response did not match the selected title",
                );
            }
            DetailOutcome::Applied | DetailOutcome::Stale => {}
        }
        // The current load has finished one way or another
        if current {
            self.detail_handle = None;
        }
    }

    pub fn close_detail(&mut self) {
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted detail load on close");
        }
        self.detail.close();
    }

    /// Something is still being fetched (drives the spinner).
    pub fn is_loading(&self) -> bool {
        self.catalog_state == CatalogState::Loading || self.detail.is_loading()
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight detail load so it does not outlive the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted detail load task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiConfig, Genre, MediaDetail, MovieDetail};
    use secrecy::SecretString;
    use tokio::time;

    fn test_client() -> Arc<CatalogClient> {
        Arc::new(
            CatalogClient::new(ApiConfig {
                base_url: "https://api.example.test/3".to_string(),
                language: "en-US".to_string(),
                token: SecretString::from("test".to_string()),
                request_timeout: Duration::from_secs(1),
            })
            .unwrap(),
        )
    }

    fn test_app() -> App {
        App::new(test_client(), DisplaySettings::default())
    }

    fn title(id: u64, name: &str, genre_ids: Vec<u32>) -> Title {
        Title {
            id,
            name: name.to_string(),
            poster_path: None,
            backdrop_path: None,
            genre_ids,
            vote_average: None,
            overview: None,
            release_date: None,
        }
    }

    fn titles(n: u64) -> Vec<Title> {
        (1..=n).map(|i| title(i, &format!("T{}", i), vec![])).collect()
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            genres: vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }],
            now_playing: titles(3),
            top_rated: titles(10),
            popular: titles(10),
            tv_shows: titles(2),
        }
    }

    fn movie_snapshot(id: u64) -> DetailSnapshot {
        DetailSnapshot {
            details: MediaDetail::Movie(MovieDetail {
                id,
                title: format!("Movie {}", id),
                overview: None,
                tagline: None,
                release_date: None,
                runtime: None,
                genres: Vec::new(),
                vote_average: None,
                vote_count: None,
                poster_path: None,
                backdrop_path: None,
            }),
            cast_names: vec!["Lead".to_string()],
        }
    }

    #[tokio::test]
    async fn test_new_app_is_empty_and_loading() {
        let app = test_app();
        assert!(app.catalog.is_empty());
        assert_eq!(app.catalog_state, CatalogState::Loading);
        assert!(app.focused_title().is_none());
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn test_publish_catalog_rebuilds_genre_index() {
        let mut app = test_app();
        app.publish_catalog(snapshot());

        assert_eq!(app.catalog_state, CatalogState::Loaded);
        assert_eq!(app.genre_index.name(28), Some("Action"));
        assert_eq!(app.genre_label(&title(1, "X", vec![28, 99])), "Action");
        assert_eq!(app.focused_title().map(|t| t.id), Some(1));
    }

    #[tokio::test]
    async fn test_genre_label_strips_control_sequences() {
        let mut app = test_app();
        let mut catalog = snapshot();
        catalog.genres[0].name = "Ac\x1b[2Jtion".to_string();
        app.publish_catalog(catalog);

        assert_eq!(app.genre_label(&title(1, "X", vec![28])), "Action");
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_prior_snapshot() {
        let mut app = test_app();
        app.publish_catalog(snapshot());
        let before = Arc::clone(&app.catalog);

        app.catalog_failed(&ApiError::Timeout(20));

        assert!(Arc::ptr_eq(&before, &app.catalog));
        assert!(matches!(app.catalog_state, CatalogState::Failed(_)));
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert!(status.unwrap().starts_with("Failed to load catalog"));
    }

    #[tokio::test]
    async fn test_cursor_wraps_within_section() {
        let mut app = test_app();
        app.publish_catalog(snapshot());
        app.focus = Section::TvShows;

        app.cursor_right();
        app.cursor_right();
        assert_eq!(app.cursors[Section::TvShows.index()], 0);
        app.cursor_left();
        assert_eq!(app.focused_title().map(|t| t.id), Some(2));
    }

    #[tokio::test]
    async fn test_cursor_on_empty_section_is_noop() {
        let mut app = test_app();
        app.focus = Section::Popular;
        app.cursor_right();
        app.cursor_left();
        assert_eq!(app.cursors, [0; 4]);
    }

    #[tokio::test]
    async fn test_window_follows_cursor() {
        let mut app = test_app();
        app.publish_catalog(snapshot());
        app.focus = Section::TopRated;
        app.row_slots[Section::TopRated.index()] = 4;

        for _ in 0..5 {
            app.cursor_right();
        }
        // Cursor at 5, window must include it
        assert!(app.visible_indices(Section::TopRated).contains(&5));

        app.cursor_left();
        app.cursor_left();
        app.cursor_left();
        app.cursor_left();
        app.cursor_left();
        app.cursor_left();
        // Wrapped to the last title
        assert_eq!(app.cursors[Section::TopRated.index()], 9);
        assert!(app.visible_indices(Section::TopRated).contains(&9));
    }

    #[tokio::test]
    async fn test_visible_indices_short_row() {
        let mut app = test_app();
        app.publish_catalog(snapshot());
        app.row_slots[Section::TvShows.index()] = 6;
        assert_eq!(app.visible_indices(Section::TvShows), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_carousels_advance_after_interval() {
        let mut app = test_app();
        app.publish_catalog(snapshot());
        app.focus = Section::TopRated;
        app.row_slots = [1, 4, 4, 4];
        let start = Instant::now();

        assert!(!app.advance_carousels(start + Duration::from_secs(1)));

        assert!(app.advance_carousels(start + Duration::from_secs(5)));
        // Hero moved, focused row held still, unfocused row paged by its window
        assert_eq!(app.cursors[Section::NowPlaying.index()], 1);
        assert_eq!(app.row_offsets[Section::TopRated.index()], 0);
        assert_eq!(app.row_offsets[Section::Popular.index()], 4);
        // TV row fits in its window, nothing to rotate
        assert_eq!(app.row_offsets[Section::TvShows.index()], 0);
    }

    #[tokio::test]
    async fn test_carousels_pause_behind_overlay() {
        let mut app = test_app();
        app.publish_catalog(snapshot());
        app.focus = Section::TopRated;
        app.begin_detail(1, MediaType::Movie);

        assert!(!app.advance_carousels(Instant::now() + Duration::from_secs(60)));
        assert_eq!(app.cursors[Section::NowPlaying.index()], 0);
    }

    #[tokio::test]
    async fn test_apply_detail_success() {
        let mut app = test_app();
        let request = app.begin_detail(42, MediaType::Movie);
        app.apply_detail(request, Ok(movie_snapshot(42)));

        assert_eq!(app.detail.snapshot().map(|s| s.id()), Some(42));
        assert!(!app.detail.is_loading());
        assert!(app.detail_handle.is_none());
    }

    #[tokio::test]
    async fn test_apply_detail_failure_sets_status_and_closes() {
        let mut app = test_app();
        let request = app.begin_detail(42, MediaType::Movie);
        app.apply_detail(
            request,
            Err(ApiError::HttpStatus {
                status: 500,
                path: "/movie/42".to_string(),
            }),
        );

        assert!(app.detail.snapshot().is_none());
        assert!(!app.detail.selection().is_open);
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert!(status.unwrap().contains("status 500"));
    }

    #[tokio::test]
    async fn test_apply_detail_wrong_media_type_reports_status() {
        let mut app = test_app();
        let request = app.begin_detail(42, MediaType::Tv);
        app.apply_detail(request, Ok(movie_snapshot(42)));

        assert!(app.detail.snapshot().is_none());
        assert!(!app.detail.selection().is_open);
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert!(status.unwrap().contains("did not match the selected title"));
    }

    #[tokio::test]
    async fn test_begin_detail_aborts_previous_load() {
        let mut app = test_app();
        app.begin_detail(1, MediaType::Movie);
        app.detail_handle = Some(tokio::spawn(std::future::pending::<()>()));

        app.begin_detail(2, MediaType::Movie);
        assert!(app.detail_handle.is_none());
        assert_eq!(app.detail.selection().selected_id, Some(2));
    }

    #[tokio::test]
    async fn test_close_detail_resets_selection() {
        let mut app = test_app();
        let request = app.begin_detail(3, MediaType::Movie);
        app.apply_detail(request, Ok(movie_snapshot(3)));
        assert!(app.detail.snapshot().is_some());
        app.detail_handle = Some(tokio::spawn(std::future::pending::<()>()));

        app.close_detail();
        assert!(app.detail_handle.is_none());
        assert!(!app.detail.selection().is_open);
        assert_eq!(app.detail.selection().selected_id, None);
        assert!(app.detail.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
