//! Feature access gate settings.
//!
//! - `GATE_MODE`: `lenient` (default) lets requests without a token reach
//!   restricted routes so the handler decides; `strict` denies them at the gate.
//! - `FEATURE_ROUTES`: comma-separated `prefix=feature` pairs replacing the
//!   built-in route table, e.g. `/dashboard/library=library,/dashboard/exams=exams`.

use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateMode {
    /// Anonymous requests to restricted routes pass through.
    #[default]
    Lenient,
    /// Anonymous requests to restricted routes are denied.
    Strict,
}

impl FromStr for GateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown gate mode: {}", other)),
        }
    }
}

impl fmt::Display for GateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

pub const DEFAULT_FEATURE_ROUTES: &[(&str, &str)] = &[
    ("/dashboard/course-catalogue", "courseCatalogue"),
    ("/dashboard/library", "library"),
    ("/dashboard/exams", "exams"),
    ("/dashboard/documents", "documents"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    pub mode: GateMode,
    /// Raw `(prefix, feature name)` pairs in configuration order.
    pub routes: Vec<(String, String)>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            mode: GateMode::default(),
            routes: DEFAULT_FEATURE_ROUTES
                .iter()
                .map(|(prefix, feature)| (prefix.to_string(), feature.to_string()))
                .collect(),
        }
    }
}

impl GateConfig {
    /// # Errors
    ///
    /// Fails on an unknown `GATE_MODE` or a malformed `FEATURE_ROUTES` entry.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(mode) = env::var("GATE_MODE") {
            config.mode = mode.parse()?;
        }
        if let Ok(routes) = env::var("FEATURE_ROUTES") {
            config.routes = parse_routes(&routes)?;
        }

        Ok(config)
    }
}

/// Parses `prefix=feature` pairs; feature names are validated by the route map.
pub fn parse_routes(raw: &str) -> Result<Vec<(String, String)>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (prefix, feature) = entry
                .split_once('=')
                .ok_or_else(|| format!("invalid FEATURE_ROUTES entry: {}", entry))?;
            let (prefix, feature) = (prefix.trim(), feature.trim());
            if !prefix.starts_with('/') || feature.is_empty() {
                return Err(format!("invalid FEATURE_ROUTES entry: {}", entry));
            }
            Ok((prefix.to_string(), feature.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes() {
        let config = GateConfig::default();
        assert_eq!(config.mode, GateMode::Lenient);
        assert_eq!(config.routes.len(), 4);
        assert_eq!(
            config.routes[1],
            ("/dashboard/library".to_string(), "library".to_string())
        );
    }

    #[test]
    fn test_gate_mode_parse() {
        assert_eq!("STRICT".parse::<GateMode>().unwrap(), GateMode::Strict);
        assert_eq!(" lenient ".parse::<GateMode>().unwrap(), GateMode::Lenient);
        assert!("deny-all".parse::<GateMode>().is_err());
    }

    #[test]
    fn test_parse_routes() {
        let routes = parse_routes("/a=library, /b = exams ,").unwrap();
        assert_eq!(
            routes,
            vec![
                ("/a".to_string(), "library".to_string()),
                ("/b".to_string(), "exams".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_routes_rejects_malformed_entries() {
        assert!(parse_routes("/a").is_err());
        assert!(parse_routes("a=library").is_err());
        assert!(parse_routes("/a=").is_err());
    }
}
