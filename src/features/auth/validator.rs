use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::model::{AuthenticatedUser, SessionClaims};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;

/// Validates HS256 session tokens signed with the shared session secret
pub struct SessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl SessionValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway.as_secs();

        Self {
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            validation,
            cookie_name: config.cookie_name.clone(),
        }
    }

    /// Name of the cookie the session token may arrive in
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))?;

        let claims = token_data.claims;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid session subject".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            role: claims.role.unwrap_or_else(|| "user".to_string()),
        })
    }
}
