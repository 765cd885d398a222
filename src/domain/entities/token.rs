use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token claims carried in the `token` cookie or a Bearer header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}
