use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::UserStore,
        repo_types::NewUser,
    },
    error::AppError,
};

const USER_EXISTS: &str = "User Already Exists";
const INVALID_CREDENTIALS: &str = "Invalid Credentials";

pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    if users.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::Conflict(USER_EXISTS.into()));
    }

    let hash = hash_password(&req.password)?;
    let user = users
        .create(NewUser {
            name: &req.name,
            email: &req.email,
            password_hash: &hash,
        })
        .await?
        .ok_or_else(|| {
            // lost a race against a concurrent registration
            warn!(email = %req.email, "email already registered");
            AppError::Conflict(USER_EXISTS.into())
        })?;

    let token = keys.issue(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        token,
        user: PublicUser {
            name: user.name,
            email: user.email,
        },
    })
}

pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let Some(user) = users.find_by_email(&req.email).await? else {
        warn!(email = %req.email, "login unknown email");
        return Err(AppError::NotFound(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&req.password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = keys.issue(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser {
            name: user.name,
            email: user.email,
        },
    })
}
