use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use lescracks_config::JwtConfig;
use lescracks_core::AuthError;

use crate::claims::Claims;

/// Mints a token for `admin_id` valid for `jwt_config.expiry_secs` from now.
pub fn issue_token(admin_id: i32, email: &str, jwt_config: &JwtConfig) -> Result<String, AuthError> {
    issue_token_at(admin_id, email, jwt_config, Utc::now().timestamp())
}

/// Mints a token as if issued at the unix time `issued_at`.
pub fn issue_token_at(
    admin_id: i32,
    email: &str,
    jwt_config: &JwtConfig,
    issued_at: i64,
) -> Result<String, AuthError> {
    if jwt_config.secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let iat = issued_at.max(0);
    let claims = Claims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        iat: iat as usize,
        exp: iat.saturating_add(jwt_config.expiry_secs).max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Checks signature and expiry and returns the embedded claims.
///
/// # Errors
///
/// - [`AuthError::InvalidSignature`] when the token was signed with another secret
/// - [`AuthError::Expired`] once `exp` has passed (no leeway)
/// - [`AuthError::Malformed`] for anything that does not parse, including a
///   non-numeric subject
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AuthError> {
    if jwt_config.secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        other => {
            tracing::debug!(kind = ?other, "Rejected unparseable token");
            AuthError::Malformed
        }
    })?;

    claims.admin_id()?;
    Ok(claims)
}
