use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::{
    AppState,
    client::{Collection, Direction, Filter, ListQuery, Record, create_from, first_as, list_as},
    error::AppError,
    models::{User, UserRecord},
    result::EmptyResponse,
    utils::{
        error_codes, error_to_api_response, hash_password, new_record_id,
        success_to_api_response,
    },
};

use super::model::{
    CreateUserRequest, UpdateUserRequest, UserQuery, is_valid_email, normalize_email,
};

const USERS_MODULE: &str = "users";

/// Writes need `users/write` on top of the route guard's `users/read`.
async fn require_write(state: &AppState) -> Result<String, AppError> {
    let session = state.session.read().await;
    let Some(user) = session.current_user() else {
        return Err(AppError::Unauthorized);
    };
    if session.has_permission(USERS_MODULE, "write") {
        Ok(user.id.clone())
    } else {
        Err(AppError::AccessDenied {
            module: USERS_MODULE.to_string(),
            permission: "write".to_string(),
            role: user.role,
        })
    }
}

fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<UserRecord>, AppError> {
    Ok(first_as(
        state.client.as_ref(),
        Collection::Users,
        ListQuery::filter(Filter::new().eq("email", email)),
    )
    .await?)
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, AppError> {
    let role = query.role_filter().map_err(AppError::Validation)?;

    let mut filter = Filter::new();
    if let Some(role) = role {
        filter = filter.eq("role", role.as_str());
    }
    let records: Vec<UserRecord> = list_as(
        state.client.as_ref(),
        Collection::Users,
        ListQuery::filter(filter).order_by("createdAt", Direction::Desc),
    )
    .await?;

    let users: Vec<User> = records
        .into_iter()
        .map(User::from)
        .filter(|user| query.matches(user))
        .collect();
    tracing::debug!("listing {} users", users.len());
    Ok((StatusCode::OK, success_to_api_response(users)))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_write(&state).await?;
    if let Err(msg) = req.validate() {
        return Ok((
            StatusCode::OK,
            error_to_api_response(error_codes::VALIDATION_ERROR, msg.to_string()),
        ));
    }

    let email = normalize_email(&req.email);
    if find_by_email(&state, &email).await?.is_some() {
        return Ok((
            StatusCode::OK,
            error_to_api_response(
                error_codes::USER_EXISTS,
                format!("A user with email {} already exists", email),
            ),
        ));
    }

    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AppError::InternalServerError
        })?),
        None => None,
    };

    let now = Utc::now();
    let record = UserRecord {
        id: new_record_id("user"),
        email,
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        role: req.role,
        department: req.department,
        phone: req.phone,
        avatar_url: None,
        is_active: req.is_active.unwrap_or(true),
        last_login: None,
        password_hash,
        created_at: Some(now),
        updated_at: Some(now),
    };
    create_from(state.client.as_ref(), Collection::Users, &record).await?;
    tracing::info!("created user {} ({})", record.email, record.role);

    Ok((StatusCode::OK, success_to_api_response(User::from(record))))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_write(&state).await?;

    let mut fields = Record::new();
    if let Some(email) = req.email {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Ok((
                StatusCode::OK,
                error_to_api_response(
                    error_codes::VALIDATION_ERROR,
                    "A valid email is required".to_string(),
                ),
            ));
        }
        if let Some(existing) = find_by_email(&state, &email).await? {
            if existing.id != id {
                return Ok((
                    StatusCode::OK,
                    error_to_api_response(
                        error_codes::USER_EXISTS,
                        format!("A user with email {} already exists", email),
                    ),
                ));
            }
        }
        fields.insert("email".into(), email.into());
    }
    if let Some(first_name) = req.first_name {
        fields.insert("firstName".into(), first_name.trim().into());
    }
    if let Some(last_name) = req.last_name {
        fields.insert("lastName".into(), last_name.trim().into());
    }
    if let Some(role) = req.role {
        fields.insert("role".into(), role.as_str().into());
    }
    if let Some(department) = req.department {
        fields.insert("department".into(), department.into());
    }
    if let Some(phone) = req.phone {
        fields.insert("phone".into(), phone.into());
    }
    if let Some(is_active) = req.is_active {
        fields.insert("isActive".into(), Value::Bool(is_active));
    }
    if let Some(password) = req.password.filter(|p| !p.is_empty()) {
        let hash = hash_password(&password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AppError::InternalServerError
        })?;
        fields.insert("passwordHash".into(), hash.into());
    }
    fields.insert("updatedAt".into(), now_string().into());

    let updated = state
        .client
        .update(Collection::Users, &id, fields)
        .await?;
    let record: UserRecord = crate::client::from_record(updated)?;
    tracing::info!("updated user {}", record.id);

    Ok((StatusCode::OK, success_to_api_response(User::from(record))))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let current_id = require_write(&state).await?;
    if current_id == id {
        return Ok((
            StatusCode::OK,
            error_to_api_response(
                error_codes::VALIDATION_ERROR,
                "You cannot delete your own account".to_string(),
            ),
        ));
    }

    state.client.delete(Collection::Users, &id).await?;
    tracing::info!("deleted user {}", id);
    Ok((StatusCode::OK, success_to_api_response(EmptyResponse {})))
}
