// JWT identity token validation

use crate::auth::{error::AuthError, models::Role};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user_id
    pub role: Role,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token service for JWT operations
///
/// Tokens are issued by the account service; the gateway only validates
/// them. `issue` exists for tooling and tests.
pub struct TokenService {
    secret: String,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key
    /// Issued tokens expire in 15 minutes (900 seconds)
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            token_duration: 900,
        }
    }

    /// Issue a token for a user
    pub fn issue(&self, user_id: i64, role: Role) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + self.token_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::ConfigError(format!("token encoding failed: {}", e)))
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}
