use std::path::PathBuf;

use chrono::FixedOffset;
use civic_core::appointment::{AllocatorConfig, SEARCH_HORIZON_WORKING_DAYS, SLOT_CAPACITY};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Directory issued certificate documents are written to.
    pub document_storage_dir: PathBuf,
    /// Period of the officer performance refresh (default: `3600`).
    pub officer_stats_interval_secs: u64,
    /// Appointment bucket capacity and search horizon.
    pub allocator: AllocatorConfig,
    /// Office time zone; "today" for appointment searches is the office's
    /// calendar date (default: UTC).
    pub office_utc_offset: FixedOffset,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `HOST`                        | `0.0.0.0`                |
    /// | `PORT`                        | `3000`                   |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                     |
    /// | `DOCUMENT_STORAGE_DIR`        | `./storage/certificates` |
    /// | `OFFICER_STATS_INTERVAL_SECS` | `3600`                   |
    /// | `SLOT_CAPACITY`               | `20`                     |
    /// | `SLOT_SEARCH_HORIZON_DAYS`    | `30`                     |
    /// | `OFFICE_UTC_OFFSET_MINUTES`   | `0`                      |
    ///
    /// # Panics
    ///
    /// Panics on malformed values; misconfiguration should stop startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let document_storage_dir = std::env::var("DOCUMENT_STORAGE_DIR")
            .unwrap_or_else(|_| "./storage/certificates".into())
            .into();

        let officer_stats_interval_secs: u64 = std::env::var("OFFICER_STATS_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("OFFICER_STATS_INTERVAL_SECS must be a valid u64");
        assert!(
            officer_stats_interval_secs > 0,
            "OFFICER_STATS_INTERVAL_SECS must be positive"
        );

        let capacity: i32 = std::env::var("SLOT_CAPACITY")
            .unwrap_or_else(|_| SLOT_CAPACITY.to_string())
            .parse()
            .expect("SLOT_CAPACITY must be a valid i32");
        assert!(capacity > 0, "SLOT_CAPACITY must be positive");

        let horizon_days: u32 = std::env::var("SLOT_SEARCH_HORIZON_DAYS")
            .unwrap_or_else(|_| SEARCH_HORIZON_WORKING_DAYS.to_string())
            .parse()
            .expect("SLOT_SEARCH_HORIZON_DAYS must be a valid u32");

        let offset_minutes: i32 = std::env::var("OFFICE_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("OFFICE_UTC_OFFSET_MINUTES must be a valid i32");
        let office_utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .expect("OFFICE_UTC_OFFSET_MINUTES must be within +/- 24 hours");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            document_storage_dir,
            officer_stats_interval_secs,
            allocator: AllocatorConfig {
                capacity,
                horizon_days,
            },
            office_utc_offset,
        }
    }
}
