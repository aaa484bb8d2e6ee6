use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{RecommendationItem, SelectedFile, SelectedFileSummary, TopK, UploadRequest},
    services::providers::RecommendationProvider,
};

/// In-memory state behind the recommendation form
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub selected_file: Option<SelectedFile>,
    pub top_k: TopK,
    pub recommendations: Vec<RecommendationItem>,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

/// Serializable snapshot of [`UiState`], without the file contents
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UiStateView {
    pub selected_file: Option<SelectedFileSummary>,
    pub top_k: TopK,
    pub recommendations: Vec<RecommendationItem>,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl From<&UiState> for UiStateView {
    fn from(state: &UiState) -> Self {
        Self {
            selected_file: state.selected_file.as_ref().map(SelectedFile::summary),
            top_k: state.top_k,
            recommendations: state.recommendations.clone(),
            error_message: state.error_message.clone(),
            is_loading: state.is_loading,
        }
    }
}

/// A submission whose request has been built but not yet settled
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: u64,
    pub request: UploadRequest,
}

/// Drives [`UiState`] through file selection, top-k changes and submissions.
///
/// Submitting is split in two so callers can release any lock around the controller
/// while the request is in flight: [`FormController::begin_submit`] validates and marks
/// the form as loading, [`FormController::settle`] applies the outcome. Only the most
/// recent submission may change the state when it settles.
#[derive(Debug, Default)]
pub struct FormController {
    state: UiState,
    latest_submission: u64,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn view(&self) -> UiStateView {
        UiStateView::from(&self.state)
    }

    /// Stores the file and clears whatever the previous file produced
    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::debug!(file = %file.name, bytes = file.len(), "File selected");
        self.state.selected_file = Some(file);
        self.state.recommendations.clear();
        self.state.error_message = None;
    }

    /// Clamps `n` into the allowed range and stores it
    pub fn set_top_k(&mut self, n: i64) -> TopK {
        let top_k = TopK::clamped(n);
        self.state.top_k = top_k;
        top_k
    }

    /// Starts a submission.
    ///
    /// Without a selected file this fails locally, records the error, and no request
    /// is built.
    pub fn begin_submit(&mut self) -> AppResult<PendingSubmission> {
        let Some(file) = self.state.selected_file.clone() else {
            let err = AppError::NoFileSelected;
            self.state.error_message = Some(err.user_message());
            return Err(err);
        };

        self.latest_submission += 1;
        self.state.is_loading = true;
        self.state.error_message = None;

        let pending = PendingSubmission {
            id: self.latest_submission,
            request: UploadRequest {
                file,
                top_k: self.state.top_k,
            },
        };

        tracing::info!(
            submission = pending.id,
            top_k = pending.request.top_k.get(),
            file = %pending.request.file.name,
            "Submission started"
        );

        Ok(pending)
    }

    /// Applies the outcome of a submission. Returns false when a newer submission
    /// has started since, in which case the state is left alone.
    pub fn settle(
        &mut self,
        submission: u64,
        result: AppResult<Vec<RecommendationItem>>,
    ) -> bool {
        match result {
            Ok(items) => self.settle_success(submission, items),
            Err(err) => self.settle_failure(submission, &err),
        }
    }

    fn is_current(&self, submission: u64) -> bool {
        if submission != self.latest_submission {
            tracing::debug!(
                submission,
                latest = self.latest_submission,
                "Ignoring outcome of superseded submission"
            );
            return false;
        }
        true
    }

    fn settle_success(&mut self, submission: u64, items: Vec<RecommendationItem>) -> bool {
        if !self.is_current(submission) {
            return false;
        }

        tracing::info!(submission, items = items.len(), "Submission succeeded");
        self.state.recommendations = items;
        self.state.error_message = None;
        self.state.is_loading = false;
        true
    }

    fn settle_failure(&mut self, submission: u64, err: &AppError) -> bool {
        if !self.is_current(submission) {
            return false;
        }

        tracing::warn!(submission, error = %err, "Submission failed");
        self.state.recommendations.clear();
        self.state.error_message = Some(err.user_message());
        self.state.is_loading = false;
        true
    }

    /// Runs a whole submission against `provider` when the controller has a single owner.
    ///
    /// Returns the number of recommendations stored. Failures are recorded in the state
    /// and also handed back to the caller.
    pub async fn submit<P>(&mut self, provider: &P) -> AppResult<usize>
    where
        P: RecommendationProvider + ?Sized,
    {
        let pending = self.begin_submit()?;

        match provider.recommend(pending.request).await {
            Ok(items) => {
                let count = items.len();
                self.settle_success(pending.id, items);
                Ok(count)
            }
            Err(err) => {
                self.settle_failure(pending.id, &err);
                Err(err)
            }
        }
    }
}
