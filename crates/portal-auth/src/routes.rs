//! Path prefix to feature table.

use portal_config::GateConfig;
use portal_models::Feature;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteMapError {
    #[error("unknown feature `{feature}` for route prefix `{prefix}`")]
    UnknownFeature { prefix: String, feature: String },
    #[error("route prefix must start with '/': `{0}`")]
    InvalidPrefix(String),
}

/// Ordered `(prefix, feature)` table, built once at startup.
///
/// Lookups use plain `starts_with`. Longer prefixes are tried first; equal
/// lengths keep configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRouteMap {
    routes: Vec<(String, Feature)>,
}

impl FeatureRouteMap {
    pub fn new(routes: impl IntoIterator<Item = (String, Feature)>) -> Self {
        let mut routes: Vec<_> = routes.into_iter().collect();
        // stable: ties stay in configuration order
        routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { routes }
    }

    /// # Errors
    ///
    /// Fails when a feature name is unknown or a prefix is not absolute.
    pub fn from_config(config: &GateConfig) -> Result<Self, RouteMapError> {
        let routes = config
            .routes
            .iter()
            .map(|(prefix, feature)| {
                if !prefix.starts_with('/') {
                    return Err(RouteMapError::InvalidPrefix(prefix.clone()));
                }
                let feature = feature
                    .parse::<Feature>()
                    .map_err(|_| RouteMapError::UnknownFeature {
                        prefix: prefix.clone(),
                        feature: feature.clone(),
                    })?;
                Ok((prefix.clone(), feature))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(routes))
    }

    /// The feature guarding `path`, if any.
    pub fn classify(&self, path: &str) -> Option<Feature> {
        self.routes
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, feature)| *feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Feature)> {
        self.routes.iter().map(|(prefix, feature)| (prefix.as_str(), *feature))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for FeatureRouteMap {
    fn default() -> Self {
        Self::new([
            ("/dashboard/course-catalogue".to_string(), Feature::CourseCatalogue),
            ("/dashboard/library".to_string(), Feature::Library),
            ("/dashboard/exams".to_string(), Feature::Exams),
            ("/dashboard/documents".to_string(), Feature::Documents),
        ])
    }
}
