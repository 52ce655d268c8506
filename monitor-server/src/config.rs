//! Configuration module

use std::collections::BTreeMap;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use bagwatch_core::logic::model::DegradationPolicy;
use bagwatch_core::EngineConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// Telemetry dataset (JSON array of records)
    pub data_path: PathBuf,

    /// ONNX health model
    pub model_path: PathBuf,

    /// Scoring history ledger
    pub history_path: PathBuf,

    /// Allowed dashboard origin, `*` for any
    pub cors_origin: String,

    /// Engine settings
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut engine = EngineConfig::default();

        if let Some(seconds) = parsed(&lookup, "INTERVAL_SECONDS") {
            engine.interval_seconds = seconds;
        }
        if let Some(scale) = parsed::<f64, _>(&lookup, "DAMAGE_SCALE") {
            let policy = DegradationPolicy::ScaledDamage { scale };
            if policy.is_valid() {
                engine.degradation = policy;
            } else {
                tracing::warn!("Ignoring DAMAGE_SCALE={}, must be finite and >= 0", scale);
            }
        }
        if let Some(raw) = lookup("INITIAL_HEALTH") {
            engine.initial_health = parse_initial_health(&raw);
        }

        Self {
            port: parsed(&lookup, "PORT").unwrap_or(8000),

            bind_addr: parsed(&lookup, "BIND_ADDR")
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),

            data_path: lookup("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/sensors_without_health.json")),

            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("model/health_model.onnx")),

            history_path: lookup("HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/realtime_health_history.json")),

            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),

            engine,
        }
    }

    /// Whether CORS is open to every origin
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origin.trim() == "*"
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            None
        }
    }
}

/// Parse `BAG_0009=0.72,BAG_0010=0.55`; malformed entries are skipped
fn parse_initial_health(raw: &str) -> BTreeMap<String, f64> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = entry
                .split_once('=')
                .and_then(|(id, value)| Some((id.trim(), value.trim().parse::<f64>().ok()?)))
                .filter(|(id, value)| !id.is_empty() && value.is_finite());

            if parsed.is_none() {
                tracing::warn!("Ignoring malformed INITIAL_HEALTH entry {:?}", entry);
            }
            parsed.map(|(id, value)| (id.to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert!(!config.allows_any_origin());
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let config = config(&[
            ("PORT", "9100"),
            ("BIND_ADDR", "0.0.0.0"),
            ("INTERVAL_SECONDS", "thirty"),
            ("DAMAGE_SCALE", "0.2"),
            ("CORS_ORIGIN", "*"),
        ]);
        assert_eq!(config.port, 9100);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.engine.interval_seconds, 15);
        assert_eq!(config.engine.degradation, DegradationPolicy::ScaledDamage { scale: 0.2 });
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_damage_scale_must_be_finite_and_non_negative() {
        for raw in ["inf", "-inf", "NaN", "-0.1"] {
            let config = config(&[("DAMAGE_SCALE", raw)]);
            assert_eq!(config.engine.degradation, DegradationPolicy::default(), "{}", raw);
        }
        let config = config(&[("DAMAGE_SCALE", "0")]);
        assert_eq!(config.engine.degradation, DegradationPolicy::ScaledDamage { scale: 0.0 });
    }

    #[test]
    fn test_huge_interval_is_accepted() {
        let config = config(&[("INTERVAL_SECONDS", "18446744073709551615")]);
        assert_eq!(config.engine.interval_seconds, u64::MAX);
    }

    #[test]
    fn test_initial_health_list() {
        let overrides = parse_initial_health(" BAG_0009=0.72, BAG_0010 = 0.55,,bogus,BAG_0011=x");
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["BAG_0009"], 0.72);
        assert_eq!(overrides["BAG_0010"], 0.55);
    }
}
