use actix_web::{Responder, post, web};
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use sqlx::PgPool;
use std::sync::Arc;

use crate::dtos::auth::{AccessResponse, RefreshRequest, TokenRequest};
use crate::services;

/// Exchanges username and password for an access/refresh token pair.
///
/// # Input
/// - `login_data`: JSON payload with `username` and `password`
///
/// # Output
/// - Success: `{"access": "...", "refresh": "..."}`
/// - Error: 401 Unauthorized for unknown users or wrong passwords
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/token', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ username: 'customer1', password: 'secret' })
/// });
/// const { access, refresh } = await response.json();
/// ```
#[post("")]
pub async fn post_token(
    login_data: web::Json<TokenRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let user = services::auth::authenticate_user(pg_pool, &login_data.into_inner()).await?;
    let tokens = services::auth::issue_tokens(&user, &config.jwt_config)?;
    log::info!("Issued tokens for {}", user.username);
    Success::ok(tokens)
}

/// Exchanges a refresh token for a new access token.
///
/// # Output
/// - Success: `{"access": "..."}`
/// - Error: 401 Unauthorized for an invalid, expired or non-refresh token
#[post("/refresh")]
pub async fn post_refresh(
    body: web::Json<RefreshRequest>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let access = services::auth::refresh_access_token(&body.refresh, &config.jwt_config)?;
    Success::ok(AccessResponse { access })
}
