use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role name carried by administrators in the session token
pub const ROLE_ADMIN: &str = "admin";

/// Acting user resolved from the session token by `auth_middleware`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Claims issued by the login service for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id, as a decimal string
    pub sub: String,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: u64,
}
