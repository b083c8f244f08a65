// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::time::Duration;

use crate::utils::{get_setting, set_setting};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const KEY_API_URL: &str = "api_url";
pub const KEY_ORIGIN: &str = "origin";
pub const KEY_TIMEOUT: &str = "timeout_secs";
pub const KEY_RETRIES: &str = "retries";
pub const KNOWN_KEYS: [&str; 4] = [KEY_API_URL, KEY_ORIGIN, KEY_TIMEOUT, KEY_RETRIES];

pub const ENV_API_URL: &str = "LENDCLIP_API_URL";
pub const ENV_ORIGIN: &str = "LENDCLIP_ORIGIN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    /// Base for shareable links; falls back to `api_url`.
    pub origin: String,
    pub timeout: Duration,
    pub retries: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub origin: Option<String>,
}

impl Overrides {
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        Self {
            api_url: m.get_one::<String>("api-url").map(|s| s.trim().to_string()),
            origin: m.get_one::<String>("origin").map(|s| s.trim().to_string()),
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl Config {
    /// Flag, then environment, then stored setting, then default.
    pub fn resolve<E>(conn: &Connection, overrides: &Overrides, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let api_url = non_empty(overrides.api_url.clone())
            .or_else(|| non_empty(env(ENV_API_URL)))
            .or(non_empty(get_setting(conn, KEY_API_URL)?))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let origin = non_empty(overrides.origin.clone())
            .or_else(|| non_empty(env(ENV_ORIGIN)))
            .or(non_empty(get_setting(conn, KEY_ORIGIN)?))
            .unwrap_or_else(|| api_url.clone());
        let timeout_secs = match get_setting(conn, KEY_TIMEOUT)? {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {} '{}'", KEY_TIMEOUT, v))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let retries = match get_setting(conn, KEY_RETRIES)? {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid {} '{}'", KEY_RETRIES, v))?,
            None => 0,
        };
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            origin: origin.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            retries,
        })
    }

    pub fn from_env(conn: &Connection, overrides: &Overrides) -> Result<Self> {
        Self::resolve(conn, overrides, |k| std::env::var(k).ok())
    }
}

/// Validate and store one setting.
pub fn store(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        KEY_API_URL | KEY_ORIGIN => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                bail!("{} must start with http:// or https://", key);
            }
        }
        KEY_TIMEOUT => {
            value
                .parse::<u64>()
                .with_context(|| format!("Invalid {} '{}'", key, value))?;
        }
        KEY_RETRIES => {
            value
                .parse::<u32>()
                .with_context(|| format!("Invalid {} '{}'", key, value))?;
        }
        other => bail!(
            "Unknown setting '{}'; expected one of {}",
            other,
            KNOWN_KEYS.join(", ")
        ),
    }
    set_setting(conn, key, value)
}
