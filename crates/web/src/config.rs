use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use storage::services::policy::{
    ChronoOrder, ExportOrdering, LiverankingOrdering, MissingScalePolicy, ScoringPolicy,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub policy: ScoringPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let defaults = ScoringPolicy::default();
        let policy = ScoringPolicy {
            incremental_liveranking: parse_or(
                var("LIVERANKING_INCREMENTAL"),
                "LIVERANKING_INCREMENTAL",
                false,
                parse_flag,
            )?,
            live_ordering: LiverankingOrdering {
                chrono: parse_or(
                    var("LIVERANKING_CHRONO_ORDER"),
                    "LIVERANKING_CHRONO_ORDER",
                    defaults.live_ordering.chrono,
                    ChronoOrder::from_str,
                )?,
            },
            export_ordering: ExportOrdering {
                chrono: parse_or(
                    var("EXPORT_CHRONO_ORDER"),
                    "EXPORT_CHRONO_ORDER",
                    defaults.export_ordering.chrono,
                    ChronoOrder::from_str,
                )?,
            },
            live_missing_scale: parse_or(
                var("LIVE_MISSING_SCALE"),
                "LIVE_MISSING_SCALE",
                defaults.live_missing_scale,
                MissingScalePolicy::from_str,
            )?,
            recompute_missing_scale: parse_or(
                var("RECOMPUTE_MISSING_SCALE"),
                "RECOMPUTE_MISSING_SCALE",
                defaults.recompute_missing_scale,
                MissingScalePolicy::from_str,
            )?,
            export_missing_scale: parse_or(
                var("EXPORT_MISSING_SCALE"),
                "EXPORT_MISSING_SCALE",
                defaults.export_missing_scale,
                MissingScalePolicy::from_str,
            )?,
        };

        Ok(Self {
            host: var("HOST").context("Cannot load HOST env variable")?,
            port: var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(
                var("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
                u32::from_str,
            )?,
            jwt_secret: var("JWT_SECRET").context("Cannot load JWT_SECRET env variable")?,
            jwt_issuer: var("JWT_ISSUER"),
            policy,
        })
    }
}

fn parse_or<T, E>(
    value: Option<String>,
    name: &str,
    default: T,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T>
where
    E: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => parse(raw.trim()).map_err(|e| anyhow!("Invalid {name} '{raw}': {e}")),
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("HOST", "127.0.0.1"),
        ("PORT", "8080"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_keep_the_observed_behaviour() {
        let config = config(&REQUIRED).unwrap();
        assert_eq!(config.policy, ScoringPolicy::default());
        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 10);
    }

    #[test]
    fn policy_can_be_overridden() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("LIVERANKING_INCREMENTAL", "true"),
            ("LIVERANKING_CHRONO_ORDER", "asc"),
            ("LIVE_MISSING_SCALE", "skip"),
        ]);
        let config = config(&vars).unwrap();
        assert!(config.policy.incremental_liveranking);
        assert_eq!(config.policy.live_ordering.chrono, ChronoOrder::Ascending);
        assert_eq!(config.policy.live_missing_scale, MissingScalePolicy::Skip);
    }

    #[test]
    fn rejects_unknown_policy_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("EXPORT_CHRONO_ORDER", "sideways"));
        assert!(config(&vars).is_err());
    }

    #[test]
    fn jwt_secret_is_required() {
        assert!(config(&REQUIRED[..2]).is_err());
    }
}
