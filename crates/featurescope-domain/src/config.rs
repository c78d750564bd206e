//! Engine configuration supplied by the host
//!
//! The core never reads settings from a store. The host builds an [`EngineConfig`]
//! once (directly, or by handing already-read TOML/JSON text to the parsers here)
//! and injects it into each component.

use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    models::BaselineStatus,
};

/// Default lifetime of analysis and recommendation cache entries
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Upper bound on the number of recommendations returned per query
pub const MAX_RECOMMENDATIONS: usize = 10;

/// How aggressively non-widely features are flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    /// Flag everything that is not widely available
    Strict,
    /// Flag limited features, inform about newly available ones
    #[default]
    Moderate,
    /// Only surface hints
    Permissive,
}

/// Diagnostic severity a host should attach to a detected feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

/// Configuration shared by the knowledge base, analyzer and recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Browsers the project targets, in priority order
    pub target_browsers: Vec<String>,
    /// Risk tolerance
    pub risk_tolerance: RiskTolerance,
    /// Maximum recommendations per query
    pub max_recommendations: usize,
    /// Cache TTL override
    #[serde(with = "duration_secs_opt")]
    pub cache_ttl: Option<Duration>,
    /// Budget for knowledge base readiness waits
    #[serde(with = "duration_secs")]
    pub readiness_timeout: Duration,
    /// Per-tier severity overrides
    pub severity_overrides: HashMap<BaselineStatus, DiagnosticSeverity>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_browsers: ["chrome", "edge", "firefox", "safari"]
                .into_iter()
                .map(String::from)
                .collect(),
            risk_tolerance: RiskTolerance::default(),
            max_recommendations: MAX_RECOMMENDATIONS,
            cache_ttl: None,
            readiness_timeout: Duration::from_secs(10),
            severity_overrides: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Parse host-supplied TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse host-supplied JSON text and validate it
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engines cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.target_browsers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one target browser is required".to_string(),
            ));
        }
        if self.max_recommendations == 0 {
            return Err(ConfigError::Validation(
                "max_recommendations must be greater than zero".to_string(),
            ));
        }
        if self.cache_ttl == Some(Duration::ZERO) {
            return Err(ConfigError::Validation(
                "cache_ttl must be greater than zero".to_string(),
            ));
        }
        if self.readiness_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "readiness_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// TTL applied to cache entries
    pub fn effective_cache_ttl(&self) -> Duration {
        self.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL)
    }

    /// Recommendation limit, clamped to `1..=10`
    pub fn recommendation_limit(&self) -> usize {
        self.max_recommendations.clamp(1, MAX_RECOMMENDATIONS)
    }

    /// Severity for a tier: the override when set, otherwise the tolerance default.
    ///
    /// Widely available features never get a diagnostic unless overridden.
    pub fn severity_for(&self, status: BaselineStatus) -> Option<DiagnosticSeverity> {
        if let Some(severity) = self.severity_overrides.get(&status) {
            return Some(*severity);
        }
        use DiagnosticSeverity::*;
        match (status, self.risk_tolerance) {
            (BaselineStatus::Widely, _) => None,
            (BaselineStatus::Newly, RiskTolerance::Strict) => Some(Warning),
            (BaselineStatus::Newly, RiskTolerance::Moderate) => Some(Information),
            (BaselineStatus::Newly, RiskTolerance::Permissive) => Some(Hint),
            (_, RiskTolerance::Strict) => Some(Error),
            (_, RiskTolerance::Moderate) => Some(Warning),
            (_, RiskTolerance::Permissive) => Some(Information),
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

mod duration_secs_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_cache_ttl(), DEFAULT_CACHE_TTL);
        assert_eq!(config.recommendation_limit(), 10);
    }

    #[test]
    fn test_from_toml_str() {
        let config = EngineConfig::from_toml_str(
            r#"
            target_browsers = ["safari", "firefox"]
            risk_tolerance = "strict"
            max_recommendations = 25
            cache_ttl = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.target_browsers, vec!["safari", "firefox"]);
        assert_eq!(config.risk_tolerance, RiskTolerance::Strict);
        assert_eq!(config.recommendation_limit(), 10);
        assert_eq!(config.effective_cache_ttl(), Duration::from_secs(60));
        assert_eq!(
            config.severity_for(BaselineStatus::Newly),
            Some(DiagnosticSeverity::Warning)
        );
        assert_eq!(config.readiness_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_severity_override_wins() {
        let mut config = EngineConfig::default();
        config
            .severity_overrides
            .insert(BaselineStatus::Newly, DiagnosticSeverity::Error);
        assert_eq!(
            config.severity_for(BaselineStatus::Newly),
            Some(DiagnosticSeverity::Error)
        );
    }

    #[test]
    fn test_from_json_str_rejects_empty_browsers() {
        let err = EngineConfig::from_json_str(r#"{"target_browsers": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = EngineConfig {
            cache_ttl: Some(Duration::ZERO),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_severity_defaults_by_tolerance() {
        let mut config = EngineConfig::default();
        assert_eq!(config.severity_for(BaselineStatus::Widely), None);
        assert_eq!(
            config.severity_for(BaselineStatus::Limited),
            Some(DiagnosticSeverity::Warning)
        );

        config.risk_tolerance = RiskTolerance::Permissive;
        assert_eq!(
            config.severity_for(BaselineStatus::Newly),
            Some(DiagnosticSeverity::Hint)
        );
        assert_eq!(
            config.severity_for(BaselineStatus::Unknown),
            Some(DiagnosticSeverity::Information)
        );
    }
}
