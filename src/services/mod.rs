pub mod form;
pub mod providers;

pub use form::{FormController, PendingSubmission, UiState, UiStateView};
pub use providers::{HttpRecommendationProvider, RecommendationProvider};
