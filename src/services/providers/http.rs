/// HTTP recommendation provider
///
/// Talks to the recommendation service over its single endpoint:
/// `POST {api_url}/recommend?top_k=N` with a multipart body holding one `file` part.
/// A 2xx answer is a JSON array of `{ title, genre, director }`; anything else
/// should carry `{ "detail": ... }`.
use crate::{
    error::{AppError, AppResult},
    models::{RecommendationItem, ServiceErrorBody, UploadRequest},
    services::providers::RecommendationProvider,
};
use reqwest::{
    multipart::{Form, Part},
    Client as HttpClient,
};

const CSV_MIME: &str = "text/csv";

#[derive(Clone)]
pub struct HttpRecommendationProvider {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecommendationProvider {
    /// Creates a provider for the service rooted at `api_url`
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), api_url)
    }

    pub fn with_client(http_client: HttpClient, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn recommend_url(&self) -> String {
        format!("{}/recommend", self.api_url)
    }

    fn build_form(request: UploadRequest) -> AppResult<Form> {
        let part = Part::bytes(request.file.bytes)
            .file_name(request.file.name)
            .mime_str(CSV_MIME)?;

        Ok(Form::new().part("file", part))
    }

    /// Turns a non-2xx body into an error, keeping the service's `detail` when it has one
    fn service_error(status: u16, body: &str) -> AppError {
        let detail = serde_json::from_str::<ServiceErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message());

        if detail.is_none() {
            tracing::debug!(status, body = %body, "Error response carried no detail");
        }

        AppError::Service { status, detail }
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for HttpRecommendationProvider {
    async fn recommend(&self, request: UploadRequest) -> AppResult<Vec<RecommendationItem>> {
        let top_k = request.top_k;
        let file_name = request.file.name.clone();
        let file_size = request.file.len();

        tracing::debug!(
            top_k = top_k.get(),
            file = %file_name,
            bytes = file_size,
            provider = self.name(),
            "Requesting recommendations"
        );

        let form = Self::build_form(request)?;

        let response = self
            .http_client
            .post(self.recommend_url())
            .query(&[("top_k", top_k.get())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, provider = self.name(), "Recommendation request failed");
                AppError::HttpClient(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = Self::service_error(status.as_u16(), &body);
            tracing::warn!(
                status = status.as_u16(),
                message = %err.user_message(),
                provider = self.name(),
                "Recommendation service returned an error"
            );
            return Err(err);
        }

        let items: Vec<RecommendationItem> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %body,
                "Failed to deserialize recommendation response"
            );
            AppError::Parse(e)
        })?;

        tracing::info!(
            top_k = top_k.get(),
            items = items.len(),
            provider = self.name(),
            "Recommendations received"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FALLBACK_MESSAGE;
    use crate::models::{SelectedFile, TopK};
    use axum::{
        extract::{Multipart, Query},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Deserialize)]
    struct RecommendQuery {
        top_k: u32,
    }

    /// Serves `router` on an ephemeral port and returns its base URL
    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Fake service that answers with `top_k` items named after the uploaded file
    async fn echo_service() -> String {
        let router = Router::new().route(
            "/recommend",
            post(
                |Query(query): Query<RecommendQuery>, mut multipart: Multipart| async move {
                    let mut parts = HashMap::new();
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().unwrap_or_default().to_string();
                        let content_type = field.content_type().unwrap_or_default().to_string();
                        let bytes = field.bytes().await.unwrap();
                        parts.insert(name, (file_name, content_type, bytes));
                    }

                    let (file_name, content_type, bytes) = &parts["file"];
                    let items: Vec<_> = (0..query.top_k)
                        .map(|i| {
                            json!({
                                "title": format!("{} #{}", file_name, i),
                                "genre": content_type,
                                "director": String::from_utf8_lossy(bytes),
                            })
                        })
                        .collect();

                    Json(items)
                },
            ),
        );

        spawn_service(router).await
    }

    async fn canned_service(status: StatusCode, body: &'static str) -> String {
        let router = Router::new().route("/recommend", post(move || async move { (status, body) }));
        spawn_service(router).await
    }

    fn upload(top_k: i64) -> UploadRequest {
        UploadRequest {
            file: SelectedFile::new("history.csv", b"Title,Date\nDark,1/1/24\n".to_vec()),
            top_k: TopK::clamped(top_k),
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider = HttpRecommendationProvider::new("http://localhost:8000/");
        assert_eq!(provider.api_url(), "http://localhost:8000");
        assert_eq!(provider.recommend_url(), "http://localhost:8000/recommend");
    }

    #[test]
    fn test_service_error_with_detail() {
        let err = HttpRecommendationProvider::service_error(400, r#"{"detail": "bad CSV"}"#);
        assert_eq!(err.user_message(), "bad CSV");
    }

    #[test]
    fn test_service_error_unparseable_body() {
        let err = HttpRecommendationProvider::service_error(500, "Internal Server Error");
        assert!(matches!(err, AppError::Service { status: 500, detail: None }));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_recommend_sends_file_and_top_k() {
        let base_url = echo_service().await;
        let provider = HttpRecommendationProvider::new(base_url);

        let items = provider.recommend(upload(3)).await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "history.csv #0");
        assert_eq!(items[2].title, "history.csv #2");
        assert_eq!(items[0].genre, "text/csv");
        assert_eq!(items[0].director, "Title,Date\nDark,1/1/24\n");
    }

    #[tokio::test]
    async fn test_recommend_empty_list() {
        let base_url = canned_service(StatusCode::OK, "[]").await;
        let provider = HttpRecommendationProvider::new(base_url);

        let items = provider.recommend(upload(5)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_error_detail() {
        let base_url = canned_service(StatusCode::BAD_REQUEST, r#"{"detail": "bad CSV"}"#).await;
        let provider = HttpRecommendationProvider::new(base_url);

        let err = provider.recommend(upload(5)).await.unwrap_err();
        assert!(matches!(err, AppError::Service { status: 400, .. }));
        assert_eq!(err.user_message(), "bad CSV");
    }

    #[tokio::test]
    async fn test_recommend_error_unparseable() {
        let base_url = canned_service(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").await;
        let provider = HttpRecommendationProvider::new(base_url);

        let err = provider.recommend(upload(5)).await.unwrap_err();
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_recommend_malformed_success_body() {
        let base_url = canned_service(StatusCode::OK, r#"{"title": "not a list"}"#).await;
        let provider = HttpRecommendationProvider::new(base_url);

        let err = provider.recommend(upload(5)).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_recommend_unreachable_service() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = HttpRecommendationProvider::new(format!("http://{}", addr));

        let err = provider.recommend(upload(5)).await.unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }
}
