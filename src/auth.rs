use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    config::Config,
    errors::{ApiError, AppError},
    models::{Claims, LoginRequest, Session},
    state::AppState,
};

const ADMIN_ID: &str = "admin";
const SESSION_HOURS: i64 = 24;

pub struct AuthClaims(pub Claims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthorized("Missing or invalid Authorization header".into())
                        .to_response()
                })?;

        AuthClaims::from_token(bearer.token(), &state.config).map_err(|e| e.to_response())
    }
}

impl AuthClaims {
    pub fn from_token(token: &str, config: &Config) -> Result<Self, AppError> {
        let secret = jwt_secret(config)?;
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        Ok(Self(token_data.claims))
    }
}

pub struct AdminAccess(pub Option<Claims>);

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.require_admin_auth {
            return Ok(AdminAccess(None));
        }

        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;
        Ok(AdminAccess(Some(claims)))
    }
}

pub fn sign_in(request: &LoginRequest, config: &Config) -> Result<Session, AppError> {
    let Some(admin) = config.admin.as_ref() else {
        return Err(AppError::Unauthorized("Admin sign-in is not enabled".into()));
    };

    let email = request.email.trim();
    if !email.eq_ignore_ascii_case(&admin.email) || request.password != admin.password {
        tracing::warn!("Rejected admin sign-in for {}", email);
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = generate_jwt(&admin.email, config)?;
    tracing::info!("Admin signed in: {}", admin.email);

    Ok(Session {
        token,
        email: admin.email.clone(),
    })
}

pub fn generate_jwt(email: &str, config: &Config) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::hours(SESSION_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: ADMIN_ID.to_string(),
        email: email.to_string(),
        exp: expiration,
    };

    let secret = jwt_secret(config)?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(AppError::JwtError)
}

fn jwt_secret(config: &Config) -> Result<&str, AppError> {
    config
        .jwt_secret
        .as_deref()
        .ok_or_else(|| AppError::EnvError("JWT_SECRET is not configured".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminCredentials;

    fn config() -> Config {
        Config {
            jwt_secret: Some("test-secret".into()),
            admin: Some(AdminCredentials {
                email: "admin@example.com".into(),
                password: "admin123".into(),
            }),
            ..Config::default()
        }
    }

    #[test]
    fn sign_in_issues_verifiable_token() {
        let config = config();
        let session = sign_in(
            &LoginRequest {
                email: "Admin@Example.com".into(),
                password: "admin123".into(),
            },
            &config,
        )
        .unwrap();

        let AuthClaims(claims) = AuthClaims::from_token(&session.token, &config).unwrap();
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.sub, ADMIN_ID);
    }

    #[test]
    fn sign_in_rejects_wrong_password() {
        let err = sign_in(
            &LoginRequest {
                email: "admin@example.com".into(),
                password: "nope".into(),
            },
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn sign_in_disabled_without_credentials() {
        let config = Config {
            jwt_secret: Some("s".into()),
            ..Config::default()
        };
        let req = LoginRequest {
            email: "admin@example.com".into(),
            password: "admin123".into(),
        };
        assert!(sign_in(&req, &config).is_err());
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        assert!(AuthClaims::from_token("not.a.jwt", &config()).is_err());
    }
}
