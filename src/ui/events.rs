//! Application event handling.
//!
//! Applies background task results to the app state. Loader failures stop
//! here: they are logged and shown in the status bar, never propagated.

use crate::app::{App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded(Ok(snapshot)) => {
            app.publish_catalog(snapshot);
        }
        AppEvent::CatalogLoaded(Err(e)) => {
            app.catalog_failed(&e);
        }
        AppEvent::DetailLoaded { request, result } => {
            app.apply_detail(request, result);
        }
        AppEvent::TaskPanicked {
            task,
            error,
            request,
        } => {
            tracing::error!(task, error, "Background task panicked");
            if let Some(request) = request {
                if request.generation != app.detail.generation() {
                    tracing::debug!(
                        id = request.id,
                        generation = request.generation,
                        "Ignoring panic from superseded detail load"
                    );
                    return;
                }
                app.close_detail();
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiConfig, ApiError, CatalogClient, MediaType};
    use crate::app::{CatalogState, DisplaySettings};
    use crate::catalog::CatalogSnapshot;
    use secrecy::SecretString;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app() -> App {
        let client = CatalogClient::new(ApiConfig {
            base_url: "https://api.example.test/3".to_string(),
            language: "en-US".to_string(),
            token: SecretString::from("t".to_string()),
            request_timeout: Duration::from_secs(1),
        })
        .unwrap();
        App::new(Arc::new(client), DisplaySettings::default())
    }

    #[tokio::test]
    async fn test_catalog_success_publishes() {
        let mut app = test_app();
        handle_app_event(&mut app, AppEvent::CatalogLoaded(Ok(CatalogSnapshot::default())));
        assert_eq!(app.catalog_state, CatalogState::Loaded);
    }

    #[tokio::test]
    async fn test_catalog_failure_reports_status() {
        let mut app = test_app();
        handle_app_event(&mut app, AppEvent::CatalogLoaded(Err(ApiError::Timeout(20))));
        assert!(matches!(app.catalog_state, CatalogState::Failed(_)));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_detail_panic_closes_overlay() {
        let mut app = test_app();
        let request = app.begin_detail(9, MediaType::Movie);
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "detail",
                error: "boom".to_string(),
                request: Some(request),
            },
        );
        assert!(!app.detail.selection().is_open);
        let status = app.status_message.as_ref().map(|(m, _)| m.to_string());
        assert_eq!(status.as_deref(), Some("Internal error in detail task"));
    }

    #[tokio::test]
    async fn test_superseded_detail_panic_keeps_current_selection() {
        let mut app = test_app();
        let first = app.begin_detail(5, MediaType::Movie);
        let _second = app.begin_detail(7, MediaType::Movie);

        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "detail",
                error: "boom".to_string(),
                request: Some(first),
            },
        );

        let selection = app.detail.selection();
        assert!(selection.is_open);
        assert_eq!(selection.selected_id, Some(7));
        assert!(app.detail.is_loading());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_catalog_panic_leaves_overlay_alone() {
        let mut app = test_app();
        app.begin_detail(3, MediaType::Tv);
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "catalog",
                error: "boom".to_string(),
                request: None,
            },
        );
        assert!(app.detail.selection().is_open);
        assert!(app.status_message.is_some());
    }
}
