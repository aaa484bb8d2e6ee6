use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::AppError,
    services::{FormController, PendingSubmission, RecommendationProvider, UiStateView},
};

/// Shared application state
///
/// One form per process: every browser tab sees the same page session.
#[derive(Clone)]
pub struct AppState {
    pub form: Arc<RwLock<FormController>>,
    pub provider: Arc<dyn RecommendationProvider>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Creates a fresh form backed by `provider`
    pub fn new(provider: Arc<dyn RecommendationProvider>) -> Self {
        Self {
            form: Arc::new(RwLock::new(FormController::new())),
            provider,
            max_upload_bytes: Config::default().max_upload_bytes,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub async fn view(&self) -> UiStateView {
        self.form.read().await.view()
    }

    /// Submits the current form and waits for it to settle. The lock is released while
    /// the request is in flight, so the page keeps rendering (with the loading flag set)
    /// in the meantime.
    pub async fn submit(&self) {
        if let Some(pending) = self.begin_submit().await {
            self.finish_submit(pending).await;
        }
    }

    /// Marks the form as loading and builds the request, or records why it cannot be sent
    pub async fn begin_submit(&self) -> Option<PendingSubmission> {
        match self.form.write().await.begin_submit() {
            Ok(pending) => Some(pending),
            Err(AppError::NoFileSelected) => {
                tracing::debug!("Submit without a selected file");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not start submission");
                None
            }
        }
    }

    /// Sends a started submission and applies its outcome
    pub async fn finish_submit(&self, pending: PendingSubmission) {
        let result = self.provider.recommend(pending.request).await;

        self.form.write().await.settle(pending.id, result);
    }

    /// Sends a started submission on a background task
    pub fn spawn_submit(&self, pending: PendingSubmission) {
        let state = self.clone();
        tokio::spawn(async move {
            state.finish_submit(pending).await;
        });
    }
}
