use actix_web::{HttpMessage, HttpResponse, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub user_id: Uuid,
    pub is_staff: bool,
    pub token_type: TokenType,
    pub jti: Uuid,
    pub iat: usize,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub user_id: Uuid,
    pub is_staff: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

fn encode_claims(spec: &ClaimsSpec, token_type: TokenType, ttl: Duration, secret: &str) -> Res<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal("Token expiration out of range".to_string()))?
        .timestamp();

    let claims = JwtClaims {
        user_id: spec.user_id,
        is_staff: spec.is_staff,
        token_type,
        jti: Uuid::new_v4(),
        iat: now.timestamp() as usize,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Generates a short-lived access token for the user
pub fn generate_access_token(spec: &ClaimsSpec, config: &JwtConfig) -> Res<String> {
    encode_claims(
        spec,
        TokenType::Access,
        Duration::minutes(config.access_minutes),
        &config.secret,
    )
}

/// Generates an access/refresh pair, as returned by the token endpoint
pub fn generate_token_pair(spec: &ClaimsSpec, config: &JwtConfig) -> Res<TokenPair> {
    Ok(TokenPair {
        access: generate_access_token(spec, config)?,
        refresh: encode_claims(
            spec,
            TokenType::Refresh,
            Duration::days(config.refresh_days),
            &config.secret,
        )?,
    })
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Same as `validate_jwt` but also checks the token is of the expected kind.
pub fn validate_jwt_of_type(token: &str, secret: &str, token_type: TokenType) -> Res<JwtClaims> {
    let claims = validate_jwt(token, secret)?;
    if claims.token_type != token_type {
        return Err(AppError::Unauthorized("Wrong token type".to_string()));
    }
    Ok(claims)
}

pub fn get_jwt_claims_or_error(req: &ServiceRequest) -> Result<JwtClaims, HttpResponse> {
    if let Some(jwt_claims_res) = req.extensions().get::<Res<JwtClaims>>() {
        match jwt_claims_res {
            Ok(claims) => Ok(claims.clone()),
            Err(app_error) => Err(app_error.to_http_response()),
        }
    } else {
        Err(
            AppError::Unauthorized("No authorization token provided".to_string())
                .to_http_response(),
        )
    }
}
