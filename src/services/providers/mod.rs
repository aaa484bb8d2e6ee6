/// Recommendation service abstraction
///
/// The page never computes recommendations itself. It hands the uploaded viewing
/// history to a provider and renders whatever comes back.
use crate::{
    error::AppResult,
    models::{RecommendationItem, UploadRequest},
};

pub mod http;

pub use http::HttpRecommendationProvider;

/// Trait for recommendation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Submit a viewing-history file and get back up to `top_k` titles, in ranked order
    async fn recommend(&self, request: UploadRequest) -> AppResult<Vec<RecommendationItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
