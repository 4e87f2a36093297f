use std::num::NonZeroU32;

use anyhow::{anyhow, Result};
use party_common::{env_or, EnvVars};

pub const DEFAULT_DRINKS_PER_ENVELOPE: u32 = 5;
pub const DEFAULT_PRIMARY_PRIZE_LABEL: &str = "good fortune";
pub const DEFAULT_PICK_RECORD_BUFFER: usize = 100;

pub struct RuntimeEnv {
    pub drinks_per_envelope: String,
    pub primary_prize_label: String,
    pub pick_record_buffer: String,
}

impl EnvVars for RuntimeEnv {
    fn load() -> Self {
        Self {
            drinks_per_envelope: env_or("DRINKS_PER_ENVELOPE", &DEFAULT_DRINKS_PER_ENVELOPE.to_string()),
            primary_prize_label: env_or("PRIMARY_PRIZE_LABEL", DEFAULT_PRIMARY_PRIZE_LABEL),
            pick_record_buffer: env_or("PICK_RECORD_BUFFER", &DEFAULT_PICK_RECORD_BUFFER.to_string()),
        }
    }

    fn get_env_var(&self, key: &str) -> String {
        match key {
            "DRINKS_PER_ENVELOPE" => self.drinks_per_envelope.clone(),
            "PRIMARY_PRIZE_LABEL" => self.primary_prize_label.clone(),
            "PICK_RECORD_BUFFER" => self.pick_record_buffer.clone(),
            _ => panic!("{} is not set", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawConfig {
    /// Drinks that earn one more envelope on top of the check-in envelope.
    pub drinks_per_pick: NonZeroU32,
    /// Win-rate rows whose label contains this (case-insensitive) are listed first.
    pub primary_label: Option<String>,
    pub record_buffer: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            drinks_per_pick: NonZeroU32::new(DEFAULT_DRINKS_PER_ENVELOPE).expect("default is non-zero"),
            primary_label: Some(DEFAULT_PRIMARY_PRIZE_LABEL.to_string()),
            record_buffer: DEFAULT_PICK_RECORD_BUFFER,
        }
    }
}

impl DrawConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&RuntimeEnv::load())
    }

    pub fn from_vars(env: &RuntimeEnv) -> Result<Self> {
        let raw_drinks = env.get_env_var("DRINKS_PER_ENVELOPE");
        let drinks_per_pick = raw_drinks.trim().parse::<u32>().ok()
            .and_then(NonZeroU32::new)
            .ok_or(anyhow!("[DrawConfig::from_vars] DRINKS_PER_ENVELOPE must be a positive integer, got {:?}", raw_drinks))?;

        let raw_buffer = env.get_env_var("PICK_RECORD_BUFFER");
        let record_buffer = raw_buffer.trim().parse::<usize>().ok()
            .filter(|size| *size > 0)
            .ok_or(anyhow!("[DrawConfig::from_vars] PICK_RECORD_BUFFER must be a positive integer, got {:?}", raw_buffer))?;

        let label = env.get_env_var("PRIMARY_PRIZE_LABEL");
        let primary_label = if label.trim().is_empty() { None } else { Some(label.trim().to_string()) };

        Ok(Self { drinks_per_pick, primary_label, record_buffer })
    }

    pub fn primary_label(&self) -> Option<&str> {
        self.primary_label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(drinks: &str, label: &str, buffer: &str) -> RuntimeEnv {
        RuntimeEnv {
            drinks_per_envelope: drinks.to_string(),
            primary_prize_label: label.to_string(),
            pick_record_buffer: buffer.to_string(),
        }
    }

    #[test]
    fn test_parses_configured_values() {
        let config = DrawConfig::from_vars(&vars("10", " Good Fortune ", "8")).unwrap();
        assert_eq!(config.drinks_per_pick.get(), 10);
        assert_eq!(config.primary_label(), Some("Good Fortune"));
        assert_eq!(config.record_buffer, 8);
    }

    #[test]
    fn test_blank_label_disables_primary_sorting() {
        let config = DrawConfig::from_vars(&vars("5", "  ", "100")).unwrap();
        assert_eq!(config.primary_label(), None);
    }

    #[test]
    fn test_rejects_zero_or_garbage_thresholds() {
        assert!(DrawConfig::from_vars(&vars("0", "", "100")).is_err());
        assert!(DrawConfig::from_vars(&vars("five", "", "100")).is_err());
        assert!(DrawConfig::from_vars(&vars("5", "", "0")).is_err());
    }

    #[test]
    fn test_default_matches_defaults_from_vars() {
        let from_vars = DrawConfig::from_vars(&vars("5", DEFAULT_PRIMARY_PRIZE_LABEL, "100")).unwrap();
        assert_eq!(from_vars, DrawConfig::default());
    }
}
