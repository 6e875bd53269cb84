//! # Settings Provider
//!
//! Difficulty knobs the engine reads when a match starts. Loading follows the usual layering:
//! defaults, then an optional TOML file, then `SIM__*` environment variables, then validation.
use crate::model::Platform;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Spawn intervals shorter than this are raised to it.
pub const MIN_SPAWN_INTERVAL: Duration = Duration::from_secs(10);

const ENV_PREFIX: &str = "SIM__";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Which delivery service new orders are attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformMode {
    /// Each order picks one of the two services at random.
    #[default]
    #[serde(rename = "mixed", alias = "all")]
    Mixed,
    #[serde(rename = "A", alias = "UberEats")]
    UberEats,
    #[serde(rename = "B", alias = "FoodPanda")]
    FoodPanda,
}

impl PlatformMode {
    /// The platform every order gets, or `None` when mixed.
    pub fn fixed(self) -> Option<Platform> {
        match self {
            PlatformMode::Mixed => None,
            PlatformMode::UberEats => Some(Platform::UberEats),
            PlatformMode::FoodPanda => Some(Platform::FoodPanda),
        }
    }
}

impl FromStr for PlatformMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mixed" | "all" => Ok(PlatformMode::Mixed),
            "A" | "UberEats" => Ok(PlatformMode::UberEats),
            "B" | "FoodPanda" => Ok(PlatformMode::FoodPanda),
            other => Err(SettingsError::invalid(
                "platform_mode",
                format!("unknown mode '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub order_timeout_seconds: u32,
    pub match_duration_seconds: u32,
    pub spawn_interval_ms: u64,
    pub min_items_per_order: u32,
    pub max_items_per_order: u32,
    pub platform_mode: PlatformMode,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            order_timeout_seconds: 60,
            match_duration_seconds: 180,
            spawn_interval_ms: 15_000,
            min_items_per_order: 1,
            max_items_per_order: 3,
            platform_mode: PlatformMode::Mixed,
        }
    }
}

impl SimSettings {
    /// Loads settings from `path` (skipped if the file does not exist), then applies `SIM__*`
    /// environment overrides and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let mut settings = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            debug!(path = %path.display(), "Reading settings file");
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        info!(?settings, "Settings loaded");
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `SIM__<FIELD>` overrides found through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("ORDER_TIMEOUT_SECONDS") {
            self.order_timeout_seconds = parse_number("order_timeout_seconds", &v)?;
        }
        if let Some(v) = var("MATCH_DURATION_SECONDS") {
            self.match_duration_seconds = parse_number("match_duration_seconds", &v)?;
        }
        if let Some(v) = var("SPAWN_INTERVAL_MS") {
            self.spawn_interval_ms = parse_number("spawn_interval_ms", &v)?;
        }
        if let Some(v) = var("MIN_ITEMS_PER_ORDER") {
            self.min_items_per_order = parse_number("min_items_per_order", &v)?;
        }
        if let Some(v) = var("MAX_ITEMS_PER_ORDER") {
            self.max_items_per_order = parse_number("max_items_per_order", &v)?;
        }
        if let Some(v) = var("PLATFORM_MODE") {
            self.platform_mode = v.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.order_timeout_seconds == 0 {
            return Err(SettingsError::invalid("order_timeout_seconds", "must be > 0"));
        }
        if self.match_duration_seconds == 0 {
            return Err(SettingsError::invalid("match_duration_seconds", "must be > 0"));
        }
        if self.min_items_per_order == 0 {
            return Err(SettingsError::invalid("min_items_per_order", "must be >= 1"));
        }
        if self.max_items_per_order < self.min_items_per_order {
            return Err(SettingsError::invalid(
                "max_items_per_order",
                format!("must be >= min_items_per_order ({})", self.min_items_per_order),
            ));
        }
        Ok(())
    }

    pub fn order_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.order_timeout_seconds))
    }

    /// Configured interval, floored to [`MIN_SPAWN_INTERVAL`].
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms).max(MIN_SPAWN_INTERVAL)
    }

    /// Inclusive item-count range with `min >= 1` and `max >= min`, whatever was configured.
    pub fn item_range(&self) -> (u32, u32) {
        let min = self.min_items_per_order.max(1);
        let max = self.max_items_per_order.max(min);
        (min, max)
    }
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, SettingsError> {
    raw.trim()
        .parse()
        .map_err(|_| SettingsError::invalid(field, format!("'{raw}' is not a number")))
}

/// Source of the current settings.
pub trait SettingsProvider: Send + Sync {
    fn current(&self) -> SimSettings;
}

impl SettingsProvider for SimSettings {
    fn current(&self) -> SimSettings {
        self.clone()
    }
}

/// Settings the admin side may change while the simulator runs. A running match keeps the copy
/// it took at start.
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<SimSettings>,
}

impl SharedSettings {
    pub fn new(settings: SimSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Replaces the settings after validating them.
    pub fn update(&self, settings: SimSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }
}

impl SettingsProvider for SharedSettings {
    fn current(&self) -> SimSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = SimSettings::default();
        assert_eq!(settings.order_timeout(), Duration::from_secs(60));
        assert_eq!(settings.match_duration_seconds, 180);
        assert_eq!(settings.spawn_interval(), Duration::from_secs(15));
        assert_eq!(settings.item_range(), (1, 3));
        assert_eq!(settings.platform_mode, PlatformMode::Mixed);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_spawn_interval_is_floored() {
        let settings = SimSettings {
            spawn_interval_ms: 2_000,
            ..SimSettings::default()
        };
        assert_eq!(settings.spawn_interval(), MIN_SPAWN_INTERVAL);
    }

    #[test]
    fn test_item_range_is_clamped() {
        let settings = SimSettings {
            min_items_per_order: 0,
            max_items_per_order: 0,
            ..SimSettings::default()
        };
        assert_eq!(settings.item_range(), (1, 1));

        let settings = SimSettings {
            min_items_per_order: 4,
            max_items_per_order: 2,
            ..SimSettings::default()
        };
        assert_eq!(settings.item_range(), (4, 4));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = SimSettings::from_toml_str(
            r#"
            order_timeout_seconds = 45
            platform_mode = "B"
            "#,
        )
        .unwrap();
        assert_eq!(settings.order_timeout_seconds, 45);
        assert_eq!(settings.platform_mode, PlatformMode::FoodPanda);
        assert_eq!(settings.match_duration_seconds, 180);
    }

    #[test]
    fn test_platform_aliases() {
        for (raw, expected) in [
            ("all", PlatformMode::Mixed),
            ("mixed", PlatformMode::Mixed),
            ("A", PlatformMode::UberEats),
            ("UberEats", PlatformMode::UberEats),
            ("FoodPanda", PlatformMode::FoodPanda),
        ] {
            let parsed: SimSettings =
                SimSettings::from_toml_str(&format!("platform_mode = \"{raw}\"")).unwrap();
            assert_eq!(parsed.platform_mode, expected);
            assert_eq!(raw.parse::<PlatformMode>().unwrap(), expected);
        }
        assert!("C".parse::<PlatformMode>().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SIM__MATCH_DURATION_SECONDS", "90"),
            ("SIM__MAX_ITEMS_PER_ORDER", "5"),
            ("SIM__PLATFORM_MODE", "A"),
        ]);
        let mut settings = SimSettings::default();
        settings
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.match_duration_seconds, 90);
        assert_eq!(settings.max_items_per_order, 5);
        assert_eq!(settings.platform_mode, PlatformMode::UberEats);
        assert_eq!(settings.order_timeout_seconds, 60);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut settings = SimSettings::default();
        let result = settings.apply_overrides(|key| {
            (key == "SIM__SPAWN_INTERVAL_MS").then(|| "soon".to_string())
        });
        assert!(matches!(
            result,
            Err(SettingsError::Invalid {
                field: "spawn_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_validate() {
        let bad = SimSettings {
            min_items_per_order: 3,
            max_items_per_order: 2,
            ..SimSettings::default()
        };
        assert!(bad.validate().is_err());

        let bad = SimSettings {
            order_timeout_seconds: 0,
            ..SimSettings::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = SimSettings::load("definitely/not/here.toml").unwrap();
        assert_eq!(settings.spawn_interval_ms, 15_000);
    }

    #[test]
    fn test_shared_settings_update() {
        let shared = SharedSettings::default();
        let faster = SimSettings {
            order_timeout_seconds: 30,
            ..SimSettings::default()
        };
        shared.update(faster).unwrap();
        assert_eq!(shared.current().order_timeout_seconds, 30);

        let invalid = SimSettings {
            match_duration_seconds: 0,
            ..SimSettings::default()
        };
        assert!(shared.update(invalid).is_err());
        assert_eq!(shared.current().order_timeout_seconds, 30);
    }

    #[test]
    fn test_poisoned_lock_keeps_settings() {
        let shared = std::sync::Arc::new(SharedSettings::new(SimSettings {
            order_timeout_seconds: 45,
            ..SimSettings::default()
        }));
        let writer = shared.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(shared.inner.is_poisoned());

        assert_eq!(shared.current().order_timeout_seconds, 45);
        shared
            .update(SimSettings {
                order_timeout_seconds: 20,
                ..SimSettings::default()
            })
            .unwrap();
        assert_eq!(shared.current().order_timeout_seconds, 20);
    }
}
