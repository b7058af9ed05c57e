use std::str::FromStr;

use crate::errors::AppError;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(AppError::EnvError(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub jwt_secret: Option<String>,
    pub admin: Option<AdminCredentials>,
    pub require_admin_auth: bool,
    pub require_name: bool,
    pub rate_limit_per_minute: u32,
    pub export_max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 5,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            jwt_secret: None,
            admin: None,
            require_admin_auth: false,
            require_name: false,
            rate_limit_per_minute: 1000,
            export_max_rows: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Config::default();

        let store_backend = match non_empty_var("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_url = non_empty_var("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(AppError::EnvError(
                "DATABASE_URL must be set when STORE_BACKEND is postgres".into(),
            ));
        }

        let admin = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminCredentials { email, password }),
            (None, None) => None,
            _ => {
                return Err(AppError::EnvError(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".into(),
                ));
            }
        };

        let jwt_secret = non_empty_var("JWT_SECRET");
        let require_admin_auth = parse_var("REQUIRE_ADMIN_AUTH", defaults.require_admin_auth)?;
        if (admin.is_some() || require_admin_auth) && jwt_secret.is_none() {
            return Err(AppError::EnvError(
                "JWT_SECRET must be set when admin sign-in is enabled".into(),
            ));
        }

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            store_backend,
            database_url,
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            jwt_secret,
            admin,
            require_admin_auth,
            require_name: parse_var("REQUIRE_NAME", defaults.require_name)?,
            rate_limit_per_minute: parse_var(
                "RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute,
            )?,
            export_max_rows: parse_var("EXPORT_MAX_ROWS", defaults.export_max_rows)?,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::EnvError(format!("Invalid {key} '{raw}': {e}"))),
        None => Ok(default),
    }
}
