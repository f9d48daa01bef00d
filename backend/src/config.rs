//! Runtime configuration from environment variables.
//!
//! | Variable            | Default             | Purpose                          |
//! |---------------------|---------------------|----------------------------------|
//! | `ECOWEEK_CSV_PATH`  | `data/ECOWEEK.csv`  | Survey export served as stats    |
//! | `ECOWEEK_PORT`      | `3000`              | HTTP port                        |
//! | `SURVEY_URL`        | unset               | External survey form             |
//! | `SUPABASE_URL`      | unset               | Comment store project URL        |
//! | `SUPABASE_ANON_KEY` | unset               | Comment store key                |
//!
//! A `.env` file in the working directory is loaded first if present.
//! Empty values count as unset.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_CSV_PATH: &str = "data/ECOWEEK.csv";
pub const DEFAULT_PORT: u16 = 3000;

/// Connection details for the managed comment store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub port: u16,
    pub survey_url: Option<String>,
    /// `None` means comments are kept in memory
    pub supabase: Option<SupabaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            port: DEFAULT_PORT,
            survey_url: None,
            supabase: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let csv_path = get("ECOWEEK_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH));

        let port = match get("ECOWEEK_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "ECOWEEK_PORT".to_string(),
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    present: "SUPABASE_URL".to_string(),
                    missing: "SUPABASE_ANON_KEY".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    present: "SUPABASE_ANON_KEY".to_string(),
                    missing: "SUPABASE_URL".to_string(),
                })
            }
        };

        Ok(Self {
            csv_path,
            port,
            survey_url: get("SURVEY_URL"),
            supabase,
        })
    }
}
