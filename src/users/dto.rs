use serde::Deserialize;

/// Body for PUT /users/{id}. The role arrives as text and is parsed into
/// a typed role so bad input fails before any storage access.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}
