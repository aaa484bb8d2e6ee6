//! The recommendation form, rendered server-side from the current [`UiStateView`].

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{Html, IntoResponse, Redirect},
};

use crate::{
    error::AppResult,
    models::{RecommendationItem, TopK},
    services::UiStateView,
};

use super::{handlers::read_upload_form, AppState};

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.view().await))
}

/// POST /
///
/// Applies the form's file and top-k fields, starts the submission, then sends the
/// browser straight back to the page. The request finishes in the background while the
/// page shows the loading state.
pub async fn submit_form(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let upload = read_upload_form(multipart).await?;

    {
        let mut form = state.form.write().await;
        if let Some(file) = upload.file {
            form.select_file(file);
        }
        if let Some(raw) = upload.top_k.as_deref() {
            form.set_top_k(i64::from(TopK::from_input(raw).get()));
        }
    }

    if let Some(pending) = state.begin_submit().await {
        state.spawn_submit(pending);
    }

    Ok(Redirect::to("/"))
}

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_item(item: &RecommendationItem) -> String {
    format!(
        r#"<li style="border: 1px solid #ccc; padding: 10px; margin: 5px 0; border-radius: 5px;"><strong>{}</strong> ({}) - Directed By <em>{}</em></li>"#,
        escape_html(&item.title),
        escape_html(&item.genre),
        escape_html(&item.director)
    )
}

pub fn render_page(view: &UiStateView) -> String {
    // Poll while a request is outstanding so the result shows up without a manual reload
    let refresh = if view.is_loading {
        r#"<meta http-equiv="refresh" content="2">"#
    } else {
        ""
    };

    let selected = view
        .selected_file
        .as_ref()
        .map(|file| {
            format!(
                r#"<p id="selected-file">Selected: {} ({} bytes)</p>"#,
                escape_html(&file.name),
                file.size_bytes
            )
        })
        .unwrap_or_default();

    let button = if view.is_loading {
        r#"<button type="submit" disabled>Getting Recommendations...</button>"#
    } else {
        r#"<button type="submit">Get Recommendations</button>"#
    };

    let error = view
        .error_message
        .as_deref()
        .map(|msg| format!(r#"<p id="error" style="color: red;">Error: {}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    let recommendations = if view.recommendations.is_empty() {
        String::new()
    } else {
        let items: String = view.recommendations.iter().map(render_item).collect();
        format!(
            r#"<div id="recommendations">
      <h2>Your Top {} Recommendations:</h2>
      <ul style="list-style-type: none; padding: 0;">{}</ul>
    </div>"#,
            view.top_k, items
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  {refresh}
  <title>Movie Recommender</title>
</head>
<body>
  <div style="font-family: sans-serif; max-width: 600px; margin: auto; padding: 20px;">
    <h1>Movie Recommender</h1>
    <p>Upload your viewing history file (e.g., NetflixViewingHistory.csv) to get recommendations.</p>

    <form method="post" action="/" enctype="multipart/form-data">
      <div style="margin-bottom: 10px;">
        <label for="topKInput">Number of Recommendations ({min}-{max}): </label>
        <input id="topKInput" name="top_k" type="number" value="{top_k}" min="{min}" max="{max}">
      </div>
      <div style="margin-bottom: 10px;">
        <input type="file" name="file" accept=".csv">
        {selected}
      </div>
      {button}
    </form>

    {error}

    {recommendations}
  </div>
</body>
</html>
"#,
        refresh = refresh,
        min = TopK::MIN,
        max = TopK::MAX,
        top_k = view.top_k,
        selected = selected,
        button = button,
        error = error,
        recommendations = recommendations,
    )
}
