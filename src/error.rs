use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every failure a request can terminate with. Gates and handlers map
/// lower-level errors into exactly one of these; the messages below are
/// the wire contract and must not change.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Token não fornecido")]
    TokenMissing,
    #[error("Token inválido")]
    TokenInvalid,
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("O e-mail deve ser único.")]
    UniqueEmail,
    #[error("Usuário não encontrado")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::TokenMissing | ApiError::TokenInvalid => {
                (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() }))
            }
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            ApiError::UniqueEmail => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_errors_are_401_with_json_body() {
        let res = ApiError::TokenMissing.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["error"], "Token não fornecido");

        let res = ApiError::TokenInvalid.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn validation_renders_errors_list() {
        let res = ApiError::Validation(vec!["a".into(), "b".into()]).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["errors"], serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn unique_email_is_400_not_found_is_404() {
        assert_eq!(
            ApiError::UniqueEmail.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        let res = ApiError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["error"], "Usuário não encontrado");
    }
}
