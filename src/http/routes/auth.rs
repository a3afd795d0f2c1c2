use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::{ProfileUpdate, Registration};
use crate::domain::{Role, User, UserView};
use crate::http::{ApiError, ApiJson, ApiResponse, AppState, AuthUser};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileBody {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// A user plus a fresh bearer token.
#[derive(Debug, Serialize)]
pub struct Session {
    #[serde(flatten)]
    user: UserView,
    token: String,
}

fn session(state: &AppState, user: &User) -> Result<Session, ApiError> {
    Ok(Session {
        user: UserView::from(user),
        token: state.jwt.generate_token(&user.id, user.role)?,
    })
}

async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RegisterBody>,
) -> Result<ApiResponse<Session>, ApiError> {
    let registration = Registration {
        name: body.name,
        email: body.email,
        password: body.password,
    };
    let user = state.users.register(registration, Role::User).await?;
    Ok(ApiResponse::created(session(&state, &user)?).message("User registered successfully"))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<ApiResponse<Session>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Please provide email and password"));
    }
    let user = state.users.authenticate(body.email, body.password).await?;
    info!(user_id = %user.id, "User logged in");
    Ok(ApiResponse::ok(session(&state, &user)?).message("Login successful"))
}

async fn profile(AuthUser(user): AuthUser) -> ApiResponse<UserView> {
    ApiResponse::ok(UserView::from(&user))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<ProfileBody>,
) -> Result<ApiResponse<Session>, ApiError> {
    let update = ProfileUpdate {
        name: body.name,
        email: body.email,
        password: body.password.filter(|password| !password.is_empty()),
    };
    let user = state.users.update_profile(user.id, update).await?;
    Ok(ApiResponse::ok(session(&state, &user)?).message("Profile updated successfully"))
}
