//! Runtime configuration: environment first, then command-line flags.

use anyhow::{anyhow, Result};

use crate::core::{CascadeMode, SessionConfig};
use crate::types::{GRID_HEIGHT, GRID_WIDTH, MAX_GRID_SIZE, MIN_GRID_SIZE, ROUND_SECONDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    /// Fixed master seed; `None` picks one from the clock at startup.
    pub seed: Option<u32>,
    pub round_secs: u32,
    pub cascade: CascadeMode,
    pub headless: bool,
    /// Log file for the TUI. Headless mode logs to stderr.
    pub log_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            seed: None,
            round_secs: ROUND_SECONDS,
            cascade: CascadeMode::Staggered,
            headless: false,
            log_path: None,
        }
    }
}

impl GameConfig {
    /// Read `DIAMOND_QUEST_*` variables. Unparseable values fall back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let log_path = lookup("DIAMOND_QUEST_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            width: env_value(&lookup, "DIAMOND_QUEST_WIDTH").unwrap_or(defaults.width),
            height: env_value(&lookup, "DIAMOND_QUEST_HEIGHT").unwrap_or(defaults.height),
            seed: env_value(&lookup, "DIAMOND_QUEST_SEED"),
            round_secs: env_value(&lookup, "DIAMOND_QUEST_ROUND_SECS").unwrap_or(defaults.round_secs),
            log_path,
            ..defaults
        }
    }

    /// Apply command-line flags (program name already stripped).
    pub fn parse_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--width" => {
                    i += 1;
                    self.width = parse_value(args.get(i), "--width")?;
                }
                "--height" => {
                    i += 1;
                    self.height = parse_value(args.get(i), "--height")?;
                }
                "--seed" => {
                    i += 1;
                    self.seed = Some(parse_value(args.get(i), "--seed")?);
                }
                "--round-secs" => {
                    i += 1;
                    self.round_secs = parse_value(args.get(i), "--round-secs")?;
                }
                "--immediate" => self.cascade = CascadeMode::Immediate,
                "--headless" => self.headless = true,
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 1;
        }

        if self.width < MIN_GRID_SIZE || self.height < MIN_GRID_SIZE {
            return Err(anyhow!(
                "grid must be at least {0}x{0}, got {1}x{2}",
                MIN_GRID_SIZE,
                self.width,
                self.height
            ));
        }
        if self.width > MAX_GRID_SIZE || self.height > MAX_GRID_SIZE {
            return Err(anyhow!(
                "grid must be at most {0}x{0}, got {1}x{2}",
                MAX_GRID_SIZE,
                self.width,
                self.height
            ));
        }
        if self.round_secs == 0 {
            return Err(anyhow!("--round-secs must be positive"));
        }
        Ok(self)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            round_seconds: self.round_secs,
            ..SessionConfig::default()
                .with_size(self.width, self.height)
                .with_cascade(self.cascade)
        }
    }
}

fn env_value<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn parse_value<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> Result<T> {
    let v = value.ok_or_else(|| anyhow!("missing value for {}", flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}
