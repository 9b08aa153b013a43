use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, TokenResponse},
        jwt::JwtKeys,
    },
    error::ApiError,
    state::AppState,
};

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    // An absent or unparseable body counts as missing credentials.
    let fields = payload
        .map(|Json(p)| (p.login, p.password))
        .unwrap_or((None, None));
    let (login, password) = match fields {
        (Some(l), Some(p)) if !l.is_empty() && !p.is_empty() => (l, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Login e senha são obrigatórios".into(),
            ))
        }
    };

    // Explicit comparison against the reference credential record.
    let reference = &state.config.credential;
    if login != reference.login || password != reference.password {
        error!("user is using incorrect login or password");
        return Err(ApiError::BadRequest("Login ou senha incorretos".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&login).map_err(|e| {
        error!(error = %e, "an error occurred while attempting to login");
        ApiError::Internal("Erro no login".into())
    })?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(login: Option<&str>, password: Option<&str>) -> LoginRequest {
        LoginRequest {
            login: login.map(String::from),
            password: password.map(String::from),
        }
    }

    #[tokio::test]
    async fn correct_credentials_yield_created_with_token() {
        let state = AppState::fake();
        let (status, Json(body)) = login(
            State(state),
            Some(Json(req(Some("login"), Some("password")))),
        )
        .await
        .expect("login ok");
        assert_eq!(status, StatusCode::CREATED);
        assert!(!body.token.is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let state = AppState::fake();
        for payload in [
            req(None, Some("password")),
            req(Some("login"), None),
            req(None, None),
            req(Some(""), Some("password")),
            req(Some("login"), Some("")),
        ] {
            let err = login(State(state.clone()), Some(Json(payload))).await.unwrap_err();
            match err {
                ApiError::BadRequest(msg) => {
                    assert_eq!(msg, "Login e senha são obrigatórios")
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn absent_body_is_rejected_with_contract_message() {
        let state = AppState::fake();
        let err = login(State(state), None).await.unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Login e senha são obrigatórios"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_credentials_are_rejected() {
        let state = AppState::fake();
        for payload in [
            req(Some("login"), Some("wrong")),
            req(Some("admin"), Some("password")),
        ] {
            let err = login(State(state.clone()), Some(Json(payload))).await.unwrap_err();
            match err {
                ApiError::BadRequest(msg) => assert_eq!(msg, "Login ou senha incorretos"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn issued_token_passes_verification() {
        let state = AppState::fake();
        let (_, Json(body)) = login(
            State(state.clone()),
            Some(Json(req(Some("login"), Some("password")))),
        )
        .await
        .expect("login ok");
        let claims = JwtKeys::from_ref(&state).verify(&body.token).expect("verify");
        assert_eq!(claims.login, "login");
    }
}
