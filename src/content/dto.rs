use serde::Deserialize;

/// Body for POST /content. The status arrives as text and defaults to
/// draft when absent.
#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub status: Option<String>,
}

/// Query string for GET /content.
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub status: Option<String>,
}
