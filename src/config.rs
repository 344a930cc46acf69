use std::env;

use anyhow::Result;
use once_cell::sync::Lazy;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_base_url: String,
    pub start_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_level: String,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn load() -> Result<Self> {
        let backend_base_url = env_string("FACE_WIZARD_BACKEND_URL", "http://127.0.0.1:8000");
        if Url::parse(&backend_base_url).is_err() {
            // Logging may not be initialized yet, so report directly.
            eprintln!("FACE_WIZARD_BACKEND_URL is not a valid URL: {backend_base_url}");
        }

        Ok(Config {
            backend_base_url,
            start_timeout_ms: env_u64("FACE_WIZARD_START_TIMEOUT_MS", 120_000),
            request_timeout_ms: env_u64("FACE_WIZARD_REQUEST_TIMEOUT_MS", 120_000),
            log_level: env_string("LOG_LEVEL", "info"),
        })
    }
}
