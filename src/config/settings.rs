//! User settings
//!
//! Holds the signed-in identity, the preferred budget period and the tuning
//! knobs of the allocation cache.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::BudgetError;
use crate::models::{PeriodKind, UserId};

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Identity of the local user, assigned by `init`
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Preferred budget period
    #[serde(default)]
    pub budget_period_type: PeriodKind,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default)]
    pub first_day_of_week: u8,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Number of allocation reports kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Lifetime of cached reports for ranges that ended before today
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Lifetime of cached reports for ranges that include today or later
    #[serde(default = "default_cache_short_ttl")]
    pub cache_short_ttl_secs: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_cache_capacity() -> usize {
    5
}

fn default_cache_ttl() -> u64 {
    1200
}

fn default_cache_short_ttl() -> u64 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: None,
            budget_period_type: PeriodKind::default(),
            first_day_of_week: 0,
            currency_symbol: default_currency(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
            cache_short_ttl_secs: default_cache_short_ttl(),
        }
    }
}

impl Settings {
    /// First day of the week as a chrono weekday
    pub fn week_start(&self) -> Weekday {
        if self.first_day_of_week == 1 {
            Weekday::Mon
        } else {
            Weekday::Sun
        }
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| BudgetError::Config(format!("Failed to parse settings file: {}", e)))
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
