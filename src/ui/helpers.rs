//! Helper functions for UI operations.
//!
//! Spawning of the background loaders and the panic guard around them.

use crate::api::CatalogClient;
use crate::app::{App, AppEvent};
use crate::catalog::load_catalog;
use crate::detail::{load_detail, DetailRequest};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but
/// not handled), panics are converted to `Err(String)` containing the panic
/// message so the UI can report them.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn the one-shot catalog load.
///
/// Sends exactly one `AppEvent::CatalogLoaded` (or `TaskPanicked`).
pub(super) fn spawn_catalog_load(
    client: Arc<CatalogClient>,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tracing::debug!("Spawning catalog load task");
    tokio::spawn(async move {
        let event = match catch_task_panic(load_catalog(&client)).await {
            Ok(result) => AppEvent::CatalogLoaded(result),
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Catalog load task panicked");
                AppEvent::TaskPanicked {
                    task: "catalog",
                    error: panic_msg,
                    request: None,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send catalog result (receiver dropped)");
        }
    })
}

/// Spawn a detail load for `request`, echoing the request back with the
/// result so the receiver can discard it if superseded.
pub(super) fn spawn_detail_load(
    client: Arc<CatalogClient>,
    request: DetailRequest,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let fut = load_detail(&client, request.media_type, request.id);
        let event = match catch_task_panic(fut).await {
            Ok(result) => AppEvent::DetailLoaded { request, result },
            Err(panic_msg) => {
                tracing::error!(id = request.id, error = %panic_msg, "Detail load task panicked");
                AppEvent::TaskPanicked {
                    task: "detail",
                    error: panic_msg,
                    request: Some(request),
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send detail result (receiver dropped)");
        }
    })
}

/// Open the detail overlay for the focused title and start its load.
///
/// Returns false when the focused row is empty.
pub(super) fn open_focused_detail(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    let Some(id) = app.focused_title().map(|t| t.id) else {
        return false;
    };
    let media_type = app.focus.media_type();
    let request = app.begin_detail(id, media_type);
    app.detail_handle = Some(spawn_detail_load(
        Arc::clone(&app.client),
        request,
        event_tx.clone(),
    ));
    true
}
