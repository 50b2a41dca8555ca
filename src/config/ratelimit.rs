//! Rate-limit rule configuration

use std::path::Path;

use feedlens_engine::Rate;
use serde::{Deserialize, Serialize};

use crate::error::FeedResult;
use crate::ratelimit::limiter::validate_rule_name;

/// Default rate when a rule doesn't set one
pub const DEFAULT_RATE: Rate = Rate { count: 5, period_secs: 60 };

/// Built-in key functions selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// Client address only
    #[default]
    Ip,
    /// Client address plus digest of the submitted description
    IpPlusDescription,
}

/// One named throttling rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRuleConfig {
    /// Letters only; becomes the `throttled.<name>` metric
    pub name: String,
    #[serde(default = "default_rate")]
    pub rate: Rate,
    #[serde(default)]
    pub key: KeyKind,
}

fn default_rate() -> Rate {
    DEFAULT_RATE
}

impl RateLimitRuleConfig {
    pub fn new(name: impl Into<String>, rate: Rate, key: KeyKind) -> Self {
        Self {
            name: name.into(),
            rate,
            key,
        }
    }
}

/// Set of throttling rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub rules: Vec<RateLimitRuleConfig>,
}

impl RateLimitConfig {
    pub fn from_json_str(json: &str) -> FeedResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FeedResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading rate-limit rules from {}", path.display());
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FeedResult<()> {
        for rule in &self.rules {
            validate_rule_name(&rule.name)?;
        }
        Ok(())
    }

    pub fn rule(&self, name: &str) -> Option<&RateLimitRuleConfig> {
        self.rules.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedlensError;

    #[test]
    fn parses_rules_with_defaults() {
        let config = RateLimitConfig::from_json_str(
            r#"{ "rules": [
                { "name": "feedback", "rate": "50/h", "key": "ip_plus_description" },
                { "name": "doublesubmit" }
            ] }"#,
        )
        .unwrap();

        let feedback = config.rule("feedback").unwrap();
        assert_eq!(feedback.rate, Rate::parse("50/h").unwrap());
        assert_eq!(feedback.key, KeyKind::IpPlusDescription);

        let double = config.rule("doublesubmit").unwrap();
        assert_eq!(double.rate, DEFAULT_RATE);
        assert_eq!(double.key, KeyKind::Ip);

        assert!(config.rule("missing").is_none());
    }

    #[test]
    fn bad_rate_rejected() {
        let err = RateLimitConfig::from_json_str(r#"{ "rules": [ { "name": "feedback", "rate": "lots" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, FeedlensError::JsonError(_)));
    }

    #[test]
    fn bad_rule_name_rejected() {
        let err = RateLimitConfig::from_json_str(r#"{ "rules": [ { "name": "feed-back" } ] }"#).unwrap_err();
        assert!(matches!(err, FeedlensError::InvalidRuleName(_)));
    }

    #[test]
    fn empty_config_is_valid() {
        let config = RateLimitConfig::from_json_str("{}").unwrap();
        assert!(config.rules.is_empty());
    }
}
