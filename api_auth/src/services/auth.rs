use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier},
};
use common::{
    env_config::JwtConfig,
    error::{AppError, Res},
    jwt::{self, ClaimsSpec, TokenPair, TokenType},
};
use db::models::user::User;
use sqlx::PgPool;

use crate::dtos::auth::TokenRequest;

pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// False for a wrong password and for a stored hash that cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Authenticates a user by username and password.
/// Unknown users and wrong passwords both yield 401.
pub async fn authenticate_user(pool: &PgPool, login_data: &TokenRequest) -> Res<User> {
    let invalid = || AppError::Unauthorized("No active account found with the given credentials".to_string());

    let (user, credentials) = db::user::get_user_with_password_hash(pool, &login_data.username)
        .await
        .map_err(|e| match e {
            AppError::Database(sqlx::Error::RowNotFound) => invalid(),
            other => other,
        })?;

    if verify_password(&login_data.password, &credentials.password_hash) {
        Ok(user)
    } else {
        Err(invalid())
    }
}

pub fn issue_tokens(user: &User, config: &JwtConfig) -> Res<TokenPair> {
    jwt::generate_token_pair(
        &ClaimsSpec {
            user_id: user.id,
            is_staff: user.is_staff,
        },
        config,
    )
}

/// Exchanges a refresh token for a fresh access token carrying the same identity.
pub fn refresh_access_token(refresh: &str, config: &JwtConfig) -> Res<String> {
    let claims = jwt::validate_jwt_of_type(refresh, &config.secret, TokenType::Refresh)?;
    jwt::generate_access_token(
        &ClaimsSpec {
            user_id: claims.user_id,
            is_staff: claims.is_staff,
        },
        config,
    )
}
