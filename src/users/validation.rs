use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{error::ApiError, users::dto::UserPayload};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

type Check = fn(&Map<String, Value>) -> Option<&'static str>;

/// The rule table: one predicate per field, evaluated in order for every
/// mutating request. All failures are collected, not just the first.
const RULES: &[Check] = &[check_name, check_email, check_age, check_active];

fn check_name(body: &Map<String, Value>) -> Option<&'static str> {
    match body.get("name") {
        Some(Value::String(s)) if s.is_empty() => Some("O nome é obrigatório"),
        Some(Value::String(s)) if s.chars().count() < 3 => {
            Some("O nome deve ter pelo menos 3 caracteres")
        }
        Some(Value::String(_)) => None,
        _ => Some("O nome deve ter pelo menos 3 caracteres"),
    }
}

fn check_email(body: &Map<String, Value>) -> Option<&'static str> {
    match body.get("email") {
        Some(Value::String(s)) if s.is_empty() => Some("O e-mail é obrigatório"),
        Some(Value::String(s)) if !EMAIL_RE.is_match(s) => Some("Formato de e-mail inválido"),
        Some(Value::String(_)) => None,
        Some(_) => Some("Formato de e-mail inválido"),
        None => Some("O e-mail é obrigatório"),
    }
}

// Optional, but a present value must be a true non-negative integer that
// fits the store's INTEGER column; numeric strings are not coerced.
fn check_age(body: &Map<String, Value>) -> Option<&'static str> {
    match body.get("age") {
        None => None,
        Some(v) => match v.as_i64().and_then(|n| i32::try_from(n).ok()) {
            Some(n) if n >= 0 => None,
            _ => Some("A idade deve ser um número"),
        },
    }
}

fn check_active(body: &Map<String, Value>) -> Option<&'static str> {
    match body.get("active") {
        None | Some(Value::Bool(_)) => None,
        Some(_) => Some("O campo active deve ser um booleano"),
    }
}

/// Run every rule over the candidate payload, collecting all failures in
/// one pass so a client sees every problem in a single round trip.
pub fn validate(value: &Value) -> Result<UserPayload, Vec<String>> {
    let empty = Map::new();
    let body = value.as_object().unwrap_or(&empty);

    let errors: Vec<String> = RULES
        .iter()
        .filter_map(|rule| rule(body).map(String::from))
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UserPayload {
        name: body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        email: body
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        age: body
            .get("age")
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok()),
        active: body.get("active").and_then(Value::as_bool),
    })
}

/// Validation gate: parses the JSON body and runs the rule table, rejecting
/// with 400 `{"errors": [...]}` before the controller is reached.
pub struct ValidUser(pub UserPayload);

#[async_trait]
impl<S> FromRequest<S> for ValidUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rej| ApiError::BadRequest(rej.body_text()))?;
        match validate(&value) {
            Ok(payload) => Ok(ValidUser(payload)),
            Err(errors) => {
                warn!(?errors, "payload failed validation");
                Err(ApiError::Validation(errors))
            }
        }
    }
}
