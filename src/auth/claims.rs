use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::Role;

/// JWT payload. The role inside is a hint only: every request re-checks
/// the stored account, so a stale claim cannot outlive a role change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // email at issue time
    pub role: Role,    // role at issue time
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}
