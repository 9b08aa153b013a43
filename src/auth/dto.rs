use serde::{Deserialize, Serialize};

/// JWT payload: who is calling, and until when the token holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub login: String, // identity claim
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}

/// Request body for login. Both fields are optional at the serde level so
/// a missing key becomes the contract's 400, not a deserialization reject.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
