use std::time::Duration;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;

const DEFAULT_TOKEN_LIFETIME: &str = "30d";

const SECOND_MS: f64 = 1_000.0;
const DAY_MS: f64 = 24.0 * 60.0 * 60.0 * SECOND_MS;
const YEAR_MS: f64 = 365.25 * DAY_MS;
/// Upper bound on token lifetimes; keeps `exp` representable.
const MAX_LIFETIME_MS: f64 = 100.0 * YEAR_MS;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").context("DATABASE_URL is not set")?;

        let secret = get("JWT_SECRET_KEY")
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET_KEY is not set")?;
        let lifetime = get("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_TOKEN_LIFETIME.into());
        let jwt = JwtConfig {
            secret,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "tasktrack".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "tasktrack-users".into()),
            ttl: parse_lifetime(&lifetime)
                .with_context(|| format!("invalid JWT_EXPIRES_IN: {lifetime:?}"))?,
        };

        let port = match get("APP_PORT").or_else(|| get("PORT")) {
            Some(v) => v.parse().with_context(|| format!("invalid port: {v:?}"))?,
            None => 3000,
        };
        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS: {v:?}"))?,
            None => 10,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            jwt,
        })
    }
}

/// Parses a token lifetime in the `ms` notation used by node's `jsonwebtoken`:
/// `30d`, `12h`, `7 days`, `1.5h`, `2w`, `1y`. A bare number counts milliseconds.
/// Lifetimes shorter than a second or longer than 100 years are rejected.
pub fn parse_lifetime(raw: &str) -> anyhow::Result<Duration> {
    lazy_static! {
        static ref LIFETIME_RE: Regex = Regex::new(
            r"(?i)^(\d+(?:\.\d+)?|\.\d+) *(milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$"
        )
        .unwrap();
    }

    let raw = raw.trim();
    let caps = LIFETIME_RE
        .captures(raw)
        .with_context(|| format!("unrecognised lifetime {raw:?}"))?;
    let amount: f64 = caps[1]
        .parse()
        .with_context(|| format!("expected a number in {raw:?}"))?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let scale = match unit.as_str() {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND_MS,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0 * SECOND_MS,
        "h" | "hr" | "hrs" | "hour" | "hours" => 60.0 * 60.0 * SECOND_MS,
        "d" | "day" | "days" => DAY_MS,
        "w" | "week" | "weeks" => 7.0 * DAY_MS,
        _ => YEAR_MS,
    };

    let ms = amount * scale;
    anyhow::ensure!(ms <= MAX_LIFETIME_MS, "lifetime {raw:?} exceeds 100 years");
    let secs = (ms / SECOND_MS).floor() as u64;
    anyhow::ensure!(secs > 0, "lifetime {raw:?} is shorter than a second");
    Ok(Duration::from_secs(secs))
}
