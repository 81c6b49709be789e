//! Environment-driven settings for the terminal runner.
//!
//! Every variable is optional. Missing or unparsable values fall back to the
//! defaults; a bad value is reported once through `tracing` and otherwise
//! ignored.

use std::path::PathBuf;

use tracing::Level;

use crate::core::GameConfig;
use crate::input::DEFAULT_KEY_RELEASE_TIMEOUT_MS;
use crate::types::Difficulty;

pub const ENV_DIFFICULTY: &str = "BLOCKFALL_DIFFICULTY";
pub const ENV_SEED: &str = "BLOCKFALL_SEED";
pub const ENV_PREVIEW: &str = "BLOCKFALL_PREVIEW";
pub const ENV_HIGH_SCORE_PATH: &str = "BLOCKFALL_HIGH_SCORE_PATH";
pub const ENV_PLAYER: &str = "BLOCKFALL_PLAYER";
pub const ENV_LOG_PATH: &str = "BLOCKFALL_LOG_PATH";
pub const ENV_LOG_LEVEL: &str = "BLOCKFALL_LOG_LEVEL";
pub const ENV_KEY_RELEASE_MS: &str = "BLOCKFALL_KEY_RELEASE_MS";

const DEFAULT_HIGH_SCORE_FILE: &str = "blockfall_highscore.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// `None` lets the caller pick a seed (the runner uses the clock)
    pub seed: Option<u32>,
    pub preview_len: usize,
    pub high_score_path: PathBuf,
    pub player: String,
    /// Logging is off unless a file is given
    pub log_path: Option<PathBuf>,
    pub log_level: Level,
    /// Synthesized key release delay for terminals that never report releases
    pub key_release_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: None,
            preview_len: 1,
            high_score_path: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            player: String::from("AAA"),
            log_path: None,
            log_level: Level::INFO,
            key_release_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get(ENV_DIFFICULTY) {
            match Difficulty::from_str(&v) {
                Some(d) => settings.difficulty = d,
                None => tracing::warn!(key = ENV_DIFFICULTY, value = %v, "unknown difficulty"),
            }
        }
        if let Some(v) = get(ENV_SEED) {
            match v.parse::<u32>() {
                Ok(seed) => settings.seed = Some(seed),
                Err(_) => tracing::warn!(key = ENV_SEED, value = %v, "seed is not a u32"),
            }
        }
        if let Some(v) = get(ENV_PREVIEW) {
            match v.parse::<usize>() {
                Ok(n) if (1..=crate::types::MAX_PREVIEW).contains(&n) => settings.preview_len = n,
                _ => tracing::warn!(key = ENV_PREVIEW, value = %v, "preview length out of range"),
            }
        }
        if let Some(v) = get(ENV_HIGH_SCORE_PATH) {
            settings.high_score_path = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_PLAYER) {
            settings.player = v;
        }
        if let Some(v) = get(ENV_LOG_PATH) {
            settings.log_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_LOG_LEVEL) {
            match v.parse::<Level>() {
                Ok(level) => settings.log_level = level,
                Err(_) => tracing::warn!(key = ENV_LOG_LEVEL, value = %v, "unknown log level"),
            }
        }
        if let Some(v) = get(ENV_KEY_RELEASE_MS) {
            match v.parse::<u32>() {
                Ok(ms) if ms > 0 => settings.key_release_ms = ms,
                _ => tracing::warn!(key = ENV_KEY_RELEASE_MS, value = %v, "key release delay must be a positive u32"),
            }
        }
        settings
    }

    /// Engine configuration; `fallback_seed` is used when no seed was set
    pub fn to_config(&self, fallback_seed: u32) -> GameConfig {
        GameConfig::new(self.seed.unwrap_or(fallback_seed))
            .with_difficulty(self.difficulty)
            .with_preview_len(self.preview_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let s = Settings::from_lookup(|_| None);
        assert_eq!(s, Settings::default());
        assert_eq!(s.to_config(9).seed, 9);
    }

    #[test]
    fn test_values_are_parsed() {
        let s = Settings::from_lookup(lookup(&[
            (ENV_DIFFICULTY, "very hard"),
            (ENV_SEED, "42"),
            (ENV_PREVIEW, "3"),
            (ENV_PLAYER, "zed"),
            (ENV_LOG_PATH, "/tmp/blockfall.log"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_KEY_RELEASE_MS, "600"),
        ]));
        assert_eq!(s.difficulty, Difficulty::VeryHard);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.preview_len, 3);
        assert_eq!(s.player, "zed");
        assert_eq!(s.log_path, Some(PathBuf::from("/tmp/blockfall.log")));
        assert_eq!(s.log_level, Level::DEBUG);
        assert_eq!(s.key_release_ms, 600);

        let config = s.to_config(1);
        assert_eq!(config.seed, 42);
        assert_eq!(config.preview_len, 3);
        assert_eq!(config.fall_curve().base_ms, 400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let s = Settings::from_lookup(lookup(&[
            (ENV_DIFFICULTY, "nightmare"),
            (ENV_SEED, "-1"),
            (ENV_PREVIEW, "9"),
            (ENV_LOG_LEVEL, "loud"),
            (ENV_PLAYER, "   "),
            (ENV_KEY_RELEASE_MS, "0"),
        ]));
        assert_eq!(s, Settings::default());
    }
}
