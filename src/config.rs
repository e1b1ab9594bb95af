use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use chrono::FixedOffset;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 20;
const DEFAULT_REPORT_RECIPIENT: &str = "hr-reports@example.com";
const DEFAULT_REPORT_SENDER: &str = "Happy Meter Bot <noreply@example.com>";

/// Runtime configuration assembled from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub store_timeout: Duration,
    pub cron_secret: Option<String>,
    pub admin_credential: AdminCredential,
    pub report: ReportSettings,
    pub mail: MailSettings,
}

/// How the admin endpoints are gated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredential {
    Open,
    Password(String),
    PasswordHash(String),
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub recipient: String,
    pub sender: String,
    pub utc_offset: FixedOffset,
    pub autosend: bool,
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let admin_credential = match (get("ADMIN_PASSWORD_HASH"), get("ADMIN_PASSWORD")) {
            (Some(hash), _) => AdminCredential::PasswordHash(hash),
            (None, Some(password)) => AdminCredential::Password(password),
            (None, None) => AdminCredential::Open,
        };

        let offset_minutes: i32 = parse_or(&get, "REPORT_UTC_OFFSET_MINUTES", 0)?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("REPORT_UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        Ok(Self {
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            store_timeout: Duration::from_secs(parse_or(
                &get,
                "STORE_TIMEOUT_SECS",
                DEFAULT_STORE_TIMEOUT_SECS,
            )?),
            cron_secret: get("CRON_SECRET"),
            admin_credential,
            report: ReportSettings {
                recipient: get("REPORT_RECIPIENT")
                    .unwrap_or_else(|| DEFAULT_REPORT_RECIPIENT.to_string()),
                sender: get("REPORT_SENDER").unwrap_or_else(|| DEFAULT_REPORT_SENDER.to_string()),
                utc_offset,
                autosend: parse_bool(&get, "WEEKLY_REPORT_AUTOSEND")?,
            },
            mail: MailSettings {
                api_url: get("MAIL_API_URL"),
                api_key: get("MAIL_API_KEY"),
                timeout: Duration::from_secs(parse_or(
                    &get,
                    "MAIL_TIMEOUT_SECS",
                    DEFAULT_MAIL_TIMEOUT_SECS,
                )?),
            },
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|err| anyhow!("{err}"))
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &str) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        None | Some("0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => bail!("invalid boolean for {key}: {other}"),
    }
}
