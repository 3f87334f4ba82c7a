use axum::response::Html;

/// GET / — upload page, embedded at compile time.
pub async fn landing_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
