use axum::response::Html;

const LANDING_PAGE: &str = include_str!("../../assets/index.html");

/// GET / - Static page showing the API is up.
pub async fn index() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
