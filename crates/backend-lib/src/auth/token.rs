// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed bearer tokens asserting `{userId, username}`.
//!
//! Tokens are self-certifying until expiry; there is no revocation and
//! the verifier never consults the identity store.
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token lifetime: one hour from issue.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Claims embedded in an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning identity's `userId`.
    pub sub: String,
    pub username: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// Issues and verifies HMAC-signed tokens with a server-held secret.
pub struct TokenSigner {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for a verified identity.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &jsonwebtoken::Validation::default())
            .map(|data| data.claims)
    }
}
