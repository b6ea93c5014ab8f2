use serde::Deserialize;

/// Query string for GET /logs.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub filter: Option<String>,
}
