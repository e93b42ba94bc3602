use std::env;
use std::path::PathBuf;

use crate::catalog::{Catalog, DEFAULT_URL_TEMPLATE};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub url_template: String,
    pub feed_dir: Option<PathBuf>,
    pub fetch_parallelism: usize,
    pub seasons: Vec<String>,
    pub competitions: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let url_template = env::var("FEED_URL_TEMPLATE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        let feed_dir = env::var("FEED_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            url_template,
            feed_dir,
            fetch_parallelism: fetch_parallelism(),
            seasons: codes_env("FEED_SEASONS"),
            competitions: codes_env("FEED_COMPETITIONS"),
        }
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::default()
            .with_url_template(self.url_template.clone())
            .restricted(&self.seasons, &self.competitions)
    }
}

/// Loads `.env.local` then `.env`; missing files are fine.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(6)
        .clamp(2, 32)
}

pub fn request_timeout_secs() -> u64 {
    env::var("FEED_TIMEOUT_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .clamp(1, 120)
}

fn codes_env(key: &str) -> Vec<String> {
    env::var(key).map(|raw| parse_codes(&raw)).unwrap_or_default()
}

pub fn parse_codes(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let code = part.trim();
        if code.is_empty() || out.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            continue;
        }
        out.push(code.to_string());
    }
    out
}
