use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lescracks_core::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Admin id, as a decimal string.
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn admin_id(&self) -> Result<i32, AuthError> {
        self.sub.parse().map_err(|_| AuthError::Malformed)
    }
}
