//! Core identity types shared across the runner.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a stored model: `namespace.name:version`.
///
/// Equality is exact on all three fields; case is preserved as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelCoordinate {
    namespace: String,
    name: String,
    version: String,
}

impl ModelCoordinate {
    /// Build a coordinate, rejecting empty or URL-unsafe parts.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let coordinate = Self {
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Coordinate from compile-time constants known to be valid.
    pub(crate) fn from_static(namespace: &'static str, name: &'static str, version: &'static str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Canonical `namespace.name:version` form used in repository URLs.
    pub fn pretty_format(&self) -> String {
        format!("{}.{}:{}", self.namespace, self.name, self.version)
    }

    /// Check all parts of a coordinate, including deserialized ones.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_part("namespace", &self.namespace, &[':'])?;
        check_part("name", &self.name, &['.', ':'])?;
        check_part("version", &self.version, &[':'])?;
        Ok(())
    }
}

fn check_part(field: &str, value: &str, forbidden: &[char]) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::InvalidCoordinate(format!("{} is empty", field)));
    }
    if let Some(c) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%') || forbidden.contains(c))
    {
        return Err(ApiError::InvalidCoordinate(format!(
            "{} '{}' contains invalid character '{}'",
            field, value, c
        )));
    }
    Ok(())
}

impl fmt::Display for ModelCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.namespace, self.name, self.version)
    }
}

impl FromStr for ModelCoordinate {
    type Err = ApiError;

    /// Parse the `namespace.name:version` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (qualified, version) = s.rsplit_once(':').ok_or_else(|| {
            ApiError::InvalidCoordinate(format!("'{}' is missing ':version'", s))
        })?;
        let (namespace, name) = qualified.rsplit_once('.').ok_or_else(|| {
            ApiError::InvalidCoordinate(format!("'{}' is missing 'namespace.'", s))
        })?;
        ModelCoordinate::new(namespace, name, version)
    }
}
