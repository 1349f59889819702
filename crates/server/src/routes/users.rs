use axum::{extract::{Query, State}, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use service::user::{parse_iso_date, User, UserData};
use tracing::info;
use validator::Validate;

use crate::errors::ApiError;
use crate::extract::{JsonBody, UserId};
use crate::state::AppState;

/// Inbound user body for create and full replace. Any `id` is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(required(message = "Email is required"), email(message = "Email should be valid"))]
    pub email: Option<String>,
    #[validate(required(message = "First name is required"), length(min = 1, message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(required(message = "Last name is required"), length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(required(message = "Birth date is required"))]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl UserInput {
    pub fn into_data(self) -> Result<UserData, ApiError> {
        self.validate()?;
        match (self.email, self.first_name, self.last_name, self.birth_date) {
            (Some(email), Some(first_name), Some(last_name), Some(birth_date)) => Ok(UserData {
                email,
                first_name,
                last_name,
                birth_date,
                address: self.address,
                phone_number: self.phone_number,
            }),
            _ => Err(ApiError::invalid("Required user fields are missing")),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub to: Option<String>,
}

fn parse_date_param(name: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    let raw = value.ok_or_else(|| ApiError::BadRequest(format!("Required request parameter '{name}' is not present")))?;
    parse_iso_date(raw).ok_or_else(|| ApiError::BadRequest(format!("Invalid date for '{name}': {raw}")))
}

#[utoipa::path(
    get, path = "/api/users", tag = "users",
    responses((status = 200, description = "All users", body = [crate::openapi::UserDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    info!("fetching all users");
    Ok(Json(state.users.list_all().await?))
}

#[utoipa::path(
    get, path = "/api/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::UserDoc),
        (status = 400, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, UserId(id): UserId) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/users", tag = "users",
    request_body = crate::openapi::UserInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let data = input.into_data()?;
    info!(email = %data.email, "creating user");
    let created = state.users.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body(content = Object, description = "Map of field name to new value"),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Not Found or Invalid Field", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(updates): JsonBody<Map<String, Value>>,
) -> Result<Json<User>, ApiError> {
    info!(user_id = id, keys = updates.len(), "updating user");
    Ok(Json(state.users.patch(id, &updates).await?))
}

#[utoipa::path(
    put, path = "/api/users/updateAll/{id}", tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = crate::openapi::UserInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Not Found or Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_all(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(input): JsonBody<UserInput>,
) -> Result<Json<User>, ApiError> {
    let data = input.into_data()?;
    info!(user_id = id, "updating all user fields");
    Ok(Json(state.users.replace_all(id, data).await?))
}

#[utoipa::path(
    delete, path = "/api/users/{id}", tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, UserId(id): UserId) -> Result<StatusCode, ApiError> {
    info!(user_id = id, "deleting user");
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/users/search", tag = "users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Users born in range", body = [crate::openapi::UserDoc]),
        (status = 400, description = "Inverted or Unparsable Range", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn search(State(state): State<AppState>, Query(q): Query<SearchQuery>) -> Result<Json<Vec<User>>, ApiError> {
    let from = parse_date_param("from", q.from.as_deref())?;
    let to = parse_date_param("to", q.to.as_deref())?;
    info!(%from, %to, "searching users by birth date");
    Ok(Json(state.users.search_by_birth_date_range(from, to).await?))
}
