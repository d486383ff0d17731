use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use models::account::{Account, AccountPayload};
use serde::{de, Deserialize, Deserializer};
use tracing::info;

use crate::errors::ApiError;
use crate::metrics;
use crate::routes::AppState;

pub const SEARCH_USAGE: &str = "Please provide a name or id to search.";

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Exact account id; wins over `name` when both are given. Blank counts as absent.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub id: Option<i64>,
    /// Case-insensitive substring of first or last name.
    pub name: Option<String>,
}

/// `id=` from an untouched form field reads as no id; anything else must parse.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Unpack and validate a create/update body. Malformed JSON and missing
/// fields both come back as validation errors.
fn validated(payload: Result<Json<AccountPayload>, JsonRejection>) -> Result<Account, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(payload.validate()?)
}

async fn find_account(state: &AppState, id: i64) -> Result<Json<Account>, ApiError> {
    match state.accounts.get_by_id(id).await? {
        Some(account) => Ok(Json(account)),
        None => Err(ApiError::account_not_found(id)),
    }
}

#[utoipa::path(
    get, path = "/accounts", tag = "accounts",
    responses(
        (status = 200, description = "All accounts in creation order", body = [crate::openapi::AccountDoc])
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    metrics::record_operation("list");
    let accounts = state.accounts.get_all().await?;
    info!(count = accounts.len(), "list accounts");
    Ok(Json(accounts))
}

#[utoipa::path(
    get, path = "/accounts/{id}", tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::AccountDoc),
        (status = 404, description = "Not Found", body = String)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Account>, ApiError> {
    metrics::record_operation("get");
    find_account(&state, id).await
}

#[utoipa::path(
    post, path = "/accounts", tag = "accounts",
    request_body = crate::openapi::AccountPayloadDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::AccountDoc),
        (status = 400, description = "Validation Error", body = String)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    metrics::record_operation("create");
    let account = validated(payload)?;
    let created = state.accounts.create(account).await?;
    info!(id = ?created.id, "created account");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/accounts/{id}", tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = crate::openapi::AccountPayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::AccountDoc),
        (status = 400, description = "Validation Error", body = String),
        (status = 500, description = "Update Failed, including unknown id", body = String)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    metrics::record_operation("update");
    let patch = validated(payload)?;
    let updated = state.accounts.update(id, patch).await.map_err(ApiError::from_mutation)?;
    info!(id, "updated account");
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/accounts/{id}", tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 500, description = "Delete Failed, including unknown id", body = String)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    metrics::record_operation("delete");
    state.accounts.delete(id).await.map_err(ApiError::from_mutation)?;
    info!(id, "deleted account");
    Ok(StatusCode::NO_CONTENT)
}

/// `id` takes precedence; otherwise a non-blank `name` runs the substring
/// search; with neither the caller gets usage help.
#[utoipa::path(
    get, path = "/accounts/search", tag = "accounts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Single account for `id`, array for `name`"),
        (status = 400, description = "Neither parameter usable", body = String),
        (status = 404, description = "Nothing matched", body = String)
    )
)]
pub async fn search(State(state): State<AppState>, Query(q): Query<SearchQuery>) -> Result<Response, ApiError> {
    metrics::record_operation("search");
    if let Some(id) = q.id {
        return Ok(find_account(&state, id).await?.into_response());
    }
    match q.name {
        Some(name) if !name.trim().is_empty() => {
            let accounts = state.accounts.search_by_name(&name).await?;
            if accounts.is_empty() {
                return Err(ApiError::no_name_match(&name));
            }
            info!(%name, count = accounts.len(), "search accounts by name");
            Ok(Json(accounts).into_response())
        }
        _ => {
            metrics::record_error(StatusCode::BAD_REQUEST);
            Ok((StatusCode::BAD_REQUEST, SEARCH_USAGE).into_response())
        }
    }
}
