use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    users::{
        dto::UserFilter,
        repo::{is_unique_violation, User},
        validation::ValidUser,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidUser(payload): ValidUser,
) -> Result<(StatusCode, Json<User>), ApiError> {
    match User::create(&state.db, &payload).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user))),
        Err(e) if is_unique_violation(&e) => Err(ApiError::UniqueEmail),
        // Generic create failures surface the raw store error to the caller.
        Err(e) => {
            error!(error = %e, "create user failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::list(&state.db, &filter).await.map_err(|e| {
        error!(error = %e, "an error occurred while searching for users");
        ApiError::Internal("Erro ao buscar usuários".into())
    })?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id).await.map_err(|e| {
        error!(error = %e, %id, "an error occurred while searching for users");
        ApiError::Internal("Erro ao buscar usuário".into())
    })?;
    match user {
        Some(user) => Ok(Json(user)),
        None => Err(ApiError::NotFound),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidUser(payload): ValidUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id).await.map_err(|e| {
        error!(error = %e, %id, "an error occurred while trying to update users");
        ApiError::Internal("Erro ao atualizar usuário".into())
    })?;
    let Some(mut user) = user else {
        return Err(ApiError::NotFound);
    };

    payload.apply_to(&mut user);

    match User::update(&state.db, &user).await {
        Ok(user) => Ok(Json(user)),
        Err(e) if is_unique_violation(&e) => {
            error!("the user tried to update an email that is already in our database");
            Err(ApiError::UniqueEmail)
        }
        Err(e) => {
            error!(error = %e, %id, "an error occurred while trying to update users");
            Err(ApiError::Internal("Erro ao atualizar usuário".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let internal = |e: sqlx::Error| {
        error!(error = %e, %id, "an error occurred while trying to delete users");
        ApiError::Internal("Erro ao deletar usuário".into())
    };

    let user = User::find_by_id(&state.db, id).await.map_err(internal)?;
    if user.is_none() {
        return Err(ApiError::NotFound);
    }

    User::delete(&state.db, id).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}
