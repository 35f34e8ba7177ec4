//! Browser origins allowed to call the API with credentials.
//!
//! - `ALLOWED_ORIGINS`: comma-separated list (default: the local dashboard
//!   dev servers on ports 3000 and 5173)
//!
//! Wildcards are not supported; the access token cookie requires explicit
//! origins.

use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::parse(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string()))
    }

    /// Splits a comma-separated origin list, dropping blanks, `*` and
    /// trailing slashes.
    pub fn parse(list: &str) -> Self {
        let allowed_origins = list
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_owned)
            .collect();

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_wildcards() {
        let config = CorsConfig::parse(" https://portal.example.edu/ ,*,, http://localhost:5173");
        assert_eq!(
            config.allowed_origins,
            vec!["https://portal.example.edu", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_default_list() {
        assert_eq!(CorsConfig::parse(DEFAULT_ORIGINS).allowed_origins.len(), 2);
    }
}
