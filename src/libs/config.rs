//! Configuration management for the lapse application.
//!
//! Settings live in a JSON file in the platform-specific application data
//! directory and cover the two polling cadences plus the single-timer
//! policy. A missing file means defaults; `lapse init` runs the interactive
//! wizard that writes one.

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::tracker::SingleTimerPolicy;
use crate::msg_error_anyhow;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Timer polling and policy settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackerSettings {
    /// Interval in milliseconds between elapsed-time recomputations for a
    /// running entry. One tick per second in production.
    pub tick_interval_ms: u64,

    /// Interval in seconds between full refreshes of the active-entry set
    /// from the store. A coarse reconciliation pass, not a substitute for
    /// the per-entry tick.
    pub refresh_interval_secs: u64,

    /// Whether starting a timer checks for other active entries first.
    pub single_timer_policy: SingleTimerPolicy,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            tick_interval_ms: 1000,
            refresh_interval_secs: 30,
            single_timer_policy: SingleTimerPolicy::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerSettings>,
}

impl Config {
    /// Loads the configuration file, or defaults when none exists yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str).map_err(|_| msg_error_anyhow!(Message::ConfigParseError))?;
        Ok(config)
    }

    /// Writes the configuration to the data directory as pretty JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self).map_err(|_| msg_error_anyhow!(Message::ConfigSaveError))?;
        Ok(())
    }

    /// Runs the interactive setup wizard, starting from the current values.
    pub fn init() -> Result<Self> {
        let current = Config::read()?.tracker.unwrap_or_default();
        let theme = ColorfulTheme::default();

        let tick_interval_ms: u64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptTickInterval.to_string())
            .default(current.tick_interval_ms)
            .interact_text()?;

        let refresh_interval_secs: u64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptRefreshInterval.to_string())
            .default(current.refresh_interval_secs)
            .interact_text()?;

        let policies = [SingleTimerPolicy::PerTask, SingleTimerPolicy::Global, SingleTimerPolicy::Unchecked];
        let default_index = policies.iter().position(|p| *p == current.single_timer_policy).unwrap_or(0);
        let selected = Select::with_theme(&theme)
            .with_prompt(Message::PromptSingleTimerPolicy.to_string())
            .items(&policies.iter().map(|p| p.to_string()).collect::<Vec<_>>())
            .default(default_index)
            .interact()?;

        Ok(Config {
            tracker: Some(TrackerSettings {
                tick_interval_ms,
                refresh_interval_secs,
                single_timer_policy: policies[selected],
            }),
        })
    }
}
